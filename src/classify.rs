//! Urgency and quadrant derivation.
//!
//! Every write path and the reconciler go through [`quadrant_from`], so the
//! stored quadrant can never disagree with how it was computed elsewhere.

use chrono::NaiveDate;

use crate::models::Quadrant;

/// A deadline this many days away (or closer) makes a task urgent.
pub const URGENCY_WINDOW_DAYS: i64 = 3;

/// Derived fields of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_urgent: bool,
    pub quadrant: Quadrant,
}

/// Signed calendar days from `reference` to `deadline`. Negative when overdue.
pub fn days_until_deadline(deadline: Option<NaiveDate>, reference: NaiveDate) -> Option<i64> {
    deadline.map(|d| d.signed_duration_since(reference).num_days())
}

/// True iff a deadline exists and is at most [`URGENCY_WINDOW_DAYS`] away.
pub fn urgency_from_deadline(deadline: Option<NaiveDate>, reference: NaiveDate) -> bool {
    days_until_deadline(deadline, reference).is_some_and(|days| days <= URGENCY_WINDOW_DAYS)
}

pub fn quadrant_from(is_important: bool, is_urgent: bool) -> Quadrant {
    match (is_important, is_urgent) {
        (true, true) => Quadrant::Q1,
        (true, false) => Quadrant::Q2,
        (false, true) => Quadrant::Q3,
        (false, false) => Quadrant::Q4,
    }
}

/// Deadline-driven classification.
pub fn classify(
    is_important: bool,
    deadline: Option<NaiveDate>,
    reference: NaiveDate,
) -> Classification {
    classify_flagged(is_important, urgency_from_deadline(deadline, reference))
}

/// Classification from a caller-supplied urgency flag.
pub fn classify_flagged(is_important: bool, is_urgent: bool) -> Classification {
    Classification {
        is_urgent,
        quadrant: quadrant_from(is_important, is_urgent),
    }
}
