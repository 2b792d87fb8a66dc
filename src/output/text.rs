use chrono::NaiveDate;

use crate::classify::days_until_deadline;
use crate::models::{Quadrant, Task, TaskStats};
use crate::reconcile::ReconcileSummary;

pub fn print_task(t: &Task, reference: NaiveDate) {
    println!("Task: {} ({})", t.title, t.id);
    if let Some(ref desc) = t.description {
        println!("  Description: {desc}");
    }
    println!("  Quadrant: {}", t.quadrant);
    println!("  Important: {}  Urgent: {}", t.is_important, t.is_urgent);
    if let Some(deadline) = t.deadline_at {
        let days = days_until_deadline(t.deadline_at, reference).unwrap_or_default();
        println!("  Deadline: {deadline} ({days} days)");
    }
    println!("  Created: {}", t.created_at.format("%Y-%m-%d %H:%M:%S"));
    if let Some(completed) = t.completed_at {
        println!("  Completed: {}", completed.format("%Y-%m-%d %H:%M:%S"));
    }
}

pub fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for t in tasks {
        let mark = if t.completed { "x" } else { " " };
        let deadline = t
            .deadline_at
            .map(|d| format!(" due {d}"))
            .unwrap_or_default();
        println!("  [{mark}] {} #{} {}{deadline}", t.quadrant, t.id, t.title);
    }
}

pub fn print_stats(s: &TaskStats) {
    println!(
        "Tasks: {} ({:.2}% completed)",
        s.total_tasks, s.percentage_completed
    );
    println!(
        "  completed={} pending={}",
        s.by_status.completed, s.by_status.pending
    );
    let quadrants: Vec<String> = Quadrant::ALL
        .iter()
        .map(|q| format!("{}={}", q, s.by_quadrant.get(*q)))
        .collect();
    println!("  {}", quadrants.join(" "));
}

pub fn print_reconcile(s: &ReconcileSummary) {
    println!(
        "Reconciled against {}: updated {} of {} open tasks",
        s.reference, s.updated, s.scanned
    );
    if s.stale > 0 {
        println!("  {} changed during the pass and were left as edited", s.stale);
    }
}
