//! Reconciliation triggers.
//!
//! Two independent loops (daily at a fixed local time, and every N minutes)
//! funnel into [`Scheduler::fire`]. A single gate is held for the whole pass,
//! including the blocking store work, so triggers that fire while a pass is
//! running are skipped instead of running alongside it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::{SchedulerConfig, MAX_INTERVAL_MINUTES};
use crate::reconcile::reconciler::{ReconcileJob, ReconcileOutcome};

/// What caused a reconciliation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Once a day at a local wall-clock time.
    Daily { hour: u32, minute: u32 },
    /// Every `minutes` minutes.
    Interval { minutes: u64 },
    /// Explicit request (CLI, tests).
    Manual,
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily { hour, minute } => write!(f, "daily at {hour:02}:{minute:02}"),
            Self::Interval { minutes } => write!(f, "every {minutes} minutes"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

#[derive(Debug)]
pub enum FireOutcome {
    Ran(ReconcileOutcome),
    /// Another pass held the gate; nothing was read or written.
    Skipped,
    /// The pass panicked on its worker thread.
    Aborted(String),
}

pub struct Scheduler<J: ReconcileJob> {
    job: Arc<J>,
    gate: Arc<Mutex<()>>,
}

impl<J: ReconcileJob> Scheduler<J> {
    pub fn new(job: Arc<J>) -> Self {
        Self {
            job,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Run a pass against today's local date, unless one is already running.
    pub async fn fire(&self, trigger: Trigger) -> FireOutcome {
        self.fire_at(trigger, Local::now().date_naive()).await
    }

    pub async fn fire_at(&self, trigger: Trigger, reference: NaiveDate) -> FireOutcome {
        let Ok(guard) = Arc::clone(&self.gate).try_lock_owned() else {
            warn!(%trigger, %reference, "reconciliation already running, skipping trigger");
            return FireOutcome::Skipped;
        };

        debug!(%trigger, %reference, "starting urgency reconciliation");
        let job = Arc::clone(&self.job);
        let joined = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            job.run(reference)
        })
        .await;

        match joined {
            Ok(outcome) => {
                if !outcome.is_success() {
                    warn!(%trigger, "reconciliation failed, next trigger will retry");
                }
                FireOutcome::Ran(outcome)
            }
            Err(e) => {
                error!(%trigger, "reconciliation task aborted: {e}");
                FireOutcome::Aborted(e.to_string())
            }
        }
    }

    /// Start the configured trigger loops. Abort the handles to stop them.
    pub fn spawn(self: Arc<Self>, config: &SchedulerConfig) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();
        if !config.enabled {
            info!("scheduler disabled");
            return handles;
        }

        if config.daily_enabled {
            match NaiveTime::from_hms_opt(config.daily_hour, config.daily_minute, 0) {
                Some(at) => handles.push(tokio::spawn(Arc::clone(&self).run_daily(at))),
                None => error!(
                    hour = config.daily_hour,
                    minute = config.daily_minute,
                    "invalid daily reconciliation time, daily trigger not started"
                ),
            }
        }
        if config.interval_enabled {
            match interval_period(config.interval_minutes) {
                Some(period) => handles.push(tokio::spawn(
                    Arc::clone(&self).run_interval(config.interval_minutes, period),
                )),
                None => error!(
                    minutes = config.interval_minutes,
                    "invalid reconciliation interval, interval trigger not started"
                ),
            }
        }

        info!(triggers = handles.len(), "scheduler started");
        handles
    }

    async fn run_daily(self: Arc<Self>, at: NaiveTime) {
        use chrono::Timelike;
        let trigger = Trigger::Daily {
            hour: at.hour(),
            minute: at.minute(),
        };
        loop {
            let now = Local::now().naive_local();
            let next = next_daily_run(now, at);
            let wait = (next - now).to_std().unwrap_or_default();
            debug!(%trigger, next = %next, "waiting for daily reconciliation");
            tokio::time::sleep(wait).await;
            self.fire(trigger).await;
        }
    }

    async fn run_interval(self: Arc<Self>, minutes: u64, period: Duration) {
        let trigger = Trigger::Interval { minutes };
        let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.fire(trigger).await;
        }
    }
}

/// Tick period for an interval trigger; `None` when zero or above the
/// configured maximum.
pub fn interval_period(minutes: u64) -> Option<Duration> {
    if minutes == 0 || minutes > MAX_INTERVAL_MINUTES {
        return None;
    }
    minutes.checked_mul(60).map(Duration::from_secs)
}

/// The first occurrence of `at` strictly after `now`.
pub fn next_daily_run(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    }
}
