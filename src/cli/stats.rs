use crate::cli::{finish, open_service, print_json};
use crate::config::Config;
use crate::error::MatrixError;
use crate::output;

pub fn run(config: &Config, json_output: bool) -> i32 {
    finish(run_inner(config, json_output), json_output)
}

fn run_inner(config: &Config, json_output: bool) -> Result<i32, MatrixError> {
    let stats = open_service(config)?.stats()?;
    if json_output {
        print_json(&output::json::success(output::json::stats_json(&stats)));
    } else {
        output::text::print_stats(&stats);
    }
    Ok(0)
}
