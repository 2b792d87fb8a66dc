use clap::Parser;
use std::process;

use todo_matrix::cli::commands::{Cli, Commands};
use todo_matrix::cli::{self, task::AddArgs};
use todo_matrix::{config, logging};

fn main() {
    let cli_args = Cli::parse();
    let json_output = cli_args.json;

    let config = match config::load(&cli_args.config) {
        Ok(config) => config,
        Err(e) => {
            cli::report_error(&e, json_output);
            process::exit(1);
        }
    };
    logging::init(&config.logging);

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(&config, json_output),
        Commands::Serve => cli::serve::run(&config),
        Commands::Reconcile { today } => cli::reconcile::run(&config, today, json_output),
        Commands::Add {
            title,
            description,
            important,
            urgent,
            deadline,
            today,
        } => cli::task::run_add(
            &config,
            AddArgs {
                title,
                description,
                important,
                urgent,
                deadline,
                today,
            },
            json_output,
        ),
        Commands::Complete { id } => cli::task::run_complete(&config, id, json_output),
        Commands::List { quadrant, status } => {
            cli::task::run_list(&config, quadrant.as_deref(), status.as_deref(), json_output)
        }
        Commands::Stats => cli::stats::run(&config, json_output),
    };

    process::exit(exit_code);
}
