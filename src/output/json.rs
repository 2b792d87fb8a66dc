use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::classify::days_until_deadline;
use crate::error::MatrixError;
use crate::models::{Task, TaskStats};
use crate::reconcile::ReconcileSummary;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &MatrixError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

/// Public representation of a task, with `days_until_deadline` relative to `reference`.
pub fn task_json(t: &Task, reference: NaiveDate) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "description": t.description,
        "is_important": t.is_important,
        "is_urgent": t.is_urgent,
        "deadline_at": t.deadline_at,
        "days_until_deadline": days_until_deadline(t.deadline_at, reference),
        "quadrant": t.quadrant.as_str(),
        "completed": t.completed,
        "created_at": t.created_at,
        "completed_at": t.completed_at
    })
}

pub fn tasks_json(tasks: &[Task], reference: NaiveDate) -> Value {
    Value::Array(tasks.iter().map(|t| task_json(t, reference)).collect())
}

pub fn stats_json(s: &TaskStats) -> Value {
    json!({
        "total_tasks": s.total_tasks,
        "by_quadrant": s.by_quadrant,
        "by_status": s.by_status,
        "percentage_completed": s.percentage_completed
    })
}

pub fn reconcile_json(s: &ReconcileSummary) -> Value {
    json!({
        "reference": s.reference,
        "scanned": s.scanned,
        "updated": s.updated,
        "stale": s.stale
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quadrant;
    use chrono::Utc;

    #[test]
    fn task_json_includes_derived_day_count() {
        let reference = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let task = Task {
            id: 3,
            title: "Renew lease".into(),
            description: None,
            is_important: true,
            is_urgent: true,
            deadline_at: NaiveDate::from_ymd_opt(2026, 10, 17),
            quadrant: Quadrant::Q1,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        };
        let v = task_json(&task, reference);
        assert_eq!(v["quadrant"], "Q1");
        assert_eq!(v["deadline_at"], "2026-10-17");
        assert_eq!(v["days_until_deadline"], -2);
        assert!(v["completed_at"].is_null());
    }

    #[test]
    fn error_envelope_carries_code() {
        let v = error(&MatrixError::task_not_found(5));
        assert_eq!(v["success"], false);
        assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
    }
}
