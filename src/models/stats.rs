use serde::Serialize;

use super::{Quadrant, Task};

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct QuadrantCounts {
    #[serde(rename = "Q1")]
    pub q1: usize,
    #[serde(rename = "Q2")]
    pub q2: usize,
    #[serde(rename = "Q3")]
    pub q3: usize,
    #[serde(rename = "Q4")]
    pub q4: usize,
}

impl QuadrantCounts {
    pub fn get(&self, quadrant: Quadrant) -> usize {
        match quadrant {
            Quadrant::Q1 => self.q1,
            Quadrant::Q2 => self.q2,
            Quadrant::Q3 => self.q3,
            Quadrant::Q4 => self.q4,
        }
    }

    fn bump(&mut self, quadrant: Quadrant) {
        match quadrant {
            Quadrant::Q1 => self.q1 += 1,
            Quadrant::Q2 => self.q2 += 1,
            Quadrant::Q3 => self.q3 += 1,
            Quadrant::Q4 => self.q4 += 1,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct StatusCounts {
    pub completed: usize,
    pub pending: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct TaskStats {
    pub total_tasks: usize,
    pub by_quadrant: QuadrantCounts,
    pub by_status: StatusCounts,
    /// Rounded to two decimals; 0 when there are no tasks.
    pub percentage_completed: f64,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut stats = Self {
            total_tasks: tasks.len(),
            ..Self::default()
        };
        for task in tasks {
            stats.by_quadrant.bump(task.quadrant);
            if task.completed {
                stats.by_status.completed += 1;
            } else {
                stats.by_status.pending += 1;
            }
        }
        if stats.total_tasks > 0 {
            let ratio = stats.by_status.completed as f64 / stats.total_tasks as f64;
            stats.percentage_completed = (ratio * 100.0 * 100.0).round() / 100.0;
        }
        stats
    }
}
