use chrono::NaiveDate;
use serde_json::json;

use crate::cli::{finish, open_service, print_json, reference_or_today};
use crate::config::Config;
use crate::error::MatrixError;
use crate::models::{CompletionStatus, CreateTask};
use crate::output;

pub struct AddArgs {
    pub title: String,
    pub description: Option<String>,
    pub important: bool,
    pub urgent: bool,
    pub deadline: Option<NaiveDate>,
    pub today: Option<NaiveDate>,
}

pub fn run_add(config: &Config, args: AddArgs, json_output: bool) -> i32 {
    finish(add_inner(config, args, json_output), json_output)
}

pub fn run_complete(config: &Config, id: i64, json_output: bool) -> i32 {
    finish(complete_inner(config, id, json_output), json_output)
}

pub fn run_list(
    config: &Config,
    quadrant: Option<&str>,
    status: Option<&str>,
    json_output: bool,
) -> i32 {
    finish(list_inner(config, quadrant, status, json_output), json_output)
}

fn add_inner(config: &Config, args: AddArgs, json_output: bool) -> Result<i32, MatrixError> {
    let service = open_service(config)?;
    let reference = reference_or_today(args.today);
    let task = service.create(
        CreateTask {
            title: args.title,
            description: args.description,
            is_important: args.important,
            is_urgent: args.urgent,
            deadline_at: args.deadline,
        },
        reference,
    )?;

    if json_output {
        print_json(&output::json::success(output::json::task_json(&task, reference)));
    } else {
        println!("Created task {} in {}: {}", task.id, task.quadrant, task.title);
    }
    Ok(0)
}

fn complete_inner(config: &Config, id: i64, json_output: bool) -> Result<i32, MatrixError> {
    let service = open_service(config)?;
    let task = service.complete(id)?;
    let reference = reference_or_today(None);

    if json_output {
        print_json(&output::json::success(output::json::task_json(&task, reference)));
    } else {
        println!("Completed task {}: {}", task.id, task.title);
        output::text::print_task(&task, reference);
    }
    Ok(0)
}

fn list_inner(
    config: &Config,
    quadrant: Option<&str>,
    status: Option<&str>,
    json_output: bool,
) -> Result<i32, MatrixError> {
    let service = open_service(config)?;
    let status = status
        .map(|raw| CompletionStatus::from_str(raw).ok_or_else(|| MatrixError::invalid_status(raw)))
        .transpose()?;

    let mut tasks = match (quadrant, status) {
        (Some(q), _) => service.by_quadrant(q)?,
        (None, Some(s)) => service.by_status(s.as_str())?,
        (None, None) => service.list()?,
    };
    if let (Some(_), Some(s)) = (quadrant, status) {
        tasks.retain(|t| t.completed == s.is_completed());
    }

    if json_output {
        let reference = reference_or_today(None);
        print_json(&output::json::success(json!({
            "tasks": output::json::tasks_json(&tasks, reference),
            "count": tasks.len()
        })));
    } else {
        output::text::print_task_list(&tasks);
    }
    Ok(0)
}
