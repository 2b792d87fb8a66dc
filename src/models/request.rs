use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Body of a task creation request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_important: bool,
    /// Only honored when no deadline is given.
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub deadline_at: Option<NaiveDate>,
}

/// Partial update: absent fields are left untouched.
///
/// `description` and `deadline_at` distinguish "absent" (`None`) from an
/// explicit `null` (`Some(None)`), which clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub is_important: Option<bool>,
    #[serde(default)]
    pub is_urgent: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub deadline_at: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl UpdateTask {
    /// Whether the update touches any input of the classification.
    pub fn affects_classification(&self) -> bool {
        self.is_important.is_some() || self.is_urgent.is_some() || self.deadline_at.is_some()
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
