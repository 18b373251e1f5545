use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{info, warn};

use super::domain::FareSheet;
use super::source::SheetSource;
use super::FareSheetError;

/// Fixed delay between sheet reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    interval: Duration,
}

impl RefreshSchedule {
    /// `interval` must be non-zero.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The first tick completes immediately.
    pub fn ticker(&self) -> Interval {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetSnapshot {
    pub loaded_at: DateTime<Utc>,
    pub sheet: FareSheet,
}

#[derive(Debug)]
pub enum RefreshOutcome {
    Loaded { rows: usize },
    Failed(FareSheetError),
}

/// Last good snapshot plus the most recent load failure, if any.
///
/// A failed reload keeps serving the previous snapshot.
#[derive(Debug, Default)]
pub struct SheetState {
    snapshot: Option<SheetSnapshot>,
    last_error: Option<String>,
}

impl SheetState {
    pub fn snapshot(&self) -> Option<&SheetSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn apply(
        &mut self,
        loaded: Result<FareSheet, FareSheetError>,
        loaded_at: DateTime<Utc>,
    ) -> RefreshOutcome {
        match loaded {
            Ok(sheet) => {
                let rows = sheet.rows().len();
                self.snapshot = Some(SheetSnapshot { loaded_at, sheet });
                self.last_error = None;
                RefreshOutcome::Loaded { rows }
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                RefreshOutcome::Failed(err)
            }
        }
    }
}

pub type SharedSheet = Arc<RwLock<SheetState>>;

/// Owns a source and reloads it whenever the caller asks.
#[derive(Debug)]
pub struct SheetRefresher<S> {
    source: S,
    state: SheetState,
}

impl<S: SheetSource> SheetRefresher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: SheetState::default(),
        }
    }

    pub fn state(&self) -> &SheetState {
        &self.state
    }

    pub fn refresh(&mut self) -> Result<&SheetSnapshot, FareSheetError> {
        let loaded = self.source.load();
        match self.state.apply(loaded, Utc::now()) {
            RefreshOutcome::Loaded { rows } => {
                info!(source = %self.source.describe(), rows, "fare sheet loaded");
            }
            RefreshOutcome::Failed(err) => {
                warn!(source = %self.source.describe(), error = %err, "fare sheet reload failed");
                return Err(err);
            }
        }

        self.state.snapshot().ok_or(FareSheetError::Empty)
    }
}

/// Reloads `source` into `shared` on every tick of `schedule`.
pub fn spawn_refresh_task<S>(
    source: S,
    shared: SharedSheet,
    schedule: RefreshSchedule,
) -> JoinHandle<()>
where
    S: SheetSource + Clone + 'static,
{
    tokio::spawn(async move {
        let mut ticker = schedule.ticker();
        loop {
            ticker.tick().await;
            let reader = source.clone();
            let loaded = match tokio::task::spawn_blocking(move || reader.load()).await {
                Ok(loaded) => loaded,
                Err(err) => {
                    warn!(error = %err, "fare sheet reload task aborted");
                    continue;
                }
            };

            let outcome = shared.write().await.apply(loaded, Utc::now());
            match outcome {
                RefreshOutcome::Loaded { rows } => {
                    info!(source = %source.describe(), rows, "fare sheet refreshed");
                }
                RefreshOutcome::Failed(err) => {
                    warn!(source = %source.describe(), error = %err, "fare sheet refresh failed");
                }
            }
        }
    })
}
