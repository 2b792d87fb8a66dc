use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Eisenhower matrix bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quadrant {
    /// Important and urgent: do first.
    Q1,
    /// Important, not urgent: schedule.
    Q2,
    /// Urgent, not important: delegate.
    Q3,
    /// Neither: drop.
    Q4,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Self::Q1, Self::Q2, Self::Q3, Self::Q4];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Q1" => Some(Self::Q1),
            "Q2" => Some(Self::Q2),
            "Q3" => Some(Self::Q3),
            "Q4" => Some(Self::Q4),
            _ => None,
        }
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion filter used by the status listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Completed,
    Pending,
}

impl CompletionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(Self::Completed),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_important: bool,
    pub is_urgent: bool,
    pub deadline_at: Option<NaiveDate>,
    pub quadrant: Quadrant,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Case-insensitive substring match on title or description.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }

    /// Mark done. `completed_at` is only stamped on the false→true transition.
    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        if !self.completed {
            self.completed = true;
            self.completed_at = Some(now);
        }
    }

    pub fn mark_pending(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }
}

/// A classified task that has not been assigned an ID yet.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub is_important: bool,
    pub is_urgent: bool,
    pub deadline_at: Option<NaiveDate>,
    pub quadrant: Quadrant,
    pub created_at: DateTime<Utc>,
}

impl TaskDraft {
    pub fn into_task(self, id: i64) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            is_important: self.is_important,
            is_urgent: self.is_urgent,
            deadline_at: self.deadline_at,
            quadrant: self.quadrant,
            completed: false,
            created_at: self.created_at,
            completed_at: None,
        }
    }
}

/// A derived-field write planned by the reconciler.
///
/// `expected_important` and `expected_deadline` are the inputs the new values
/// were computed from; the store drops the change if the row no longer has them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrgencyChange {
    pub id: i64,
    pub is_urgent: bool,
    pub quadrant: Quadrant,
    pub expected_important: bool,
    pub expected_deadline: Option<NaiveDate>,
    /// Derived fields as scanned; a row already rewritten by another pass no
    /// longer matches.
    pub expected_urgent: bool,
    pub expected_quadrant: Quadrant,
}

impl UrgencyChange {
    /// Whether the change still applies to `task` as it is now stored.
    pub fn applies_to(&self, task: &Task) -> bool {
        task.id == self.id
            && !task.completed
            && task.is_important == self.expected_important
            && task.deadline_at == self.expected_deadline
            && task.is_urgent == self.expected_urgent
            && task.quadrant == self.expected_quadrant
    }
}
