use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::errors::{AppError, AppResult};

pub type TickCallback = Arc<dyn Fn() + Send + Sync>;

/// A single repeating tick source. Starting replaces any previous source;
/// cancelling is idempotent.
pub trait TimerDriver: Send + Sync {
    fn start(&self, period: Duration, on_tick: TickCallback);
    fn cancel(&self);
    fn is_running(&self) -> bool;
}

/// Tick source backed by a tokio task
pub struct TokioTimerDriver {
    runtime: Handle,
    worker_handle: Mutex<Option<JoinHandle<()>>>,
}

impl TokioTimerDriver {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            worker_handle: Mutex::new(None),
        }
    }

    /// Bind to the runtime the caller is running on
    pub fn current() -> AppResult<Self> {
        let runtime = Handle::try_current().map_err(|e| {
            AppError::Configuration(format!("Timer driver needs a tokio runtime: {}", e))
        })?;
        Ok(Self::new(runtime))
    }
}

impl TimerDriver for TokioTimerDriver {
    fn start(&self, period: Duration, on_tick: TickCallback) {
        let mut handle = self
            .worker_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = handle.take() {
            previous.abort();
        }

        let worker_handle = self.runtime.spawn(async move {
            // First tick fires one full period after start
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                on_tick();
            }
        });

        *handle = Some(worker_handle);
    }

    fn cancel(&self) {
        let mut handle = self
            .worker_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(join_handle) = handle.take() {
            join_handle.abort();
        }
    }

    fn is_running(&self) -> bool {
        self.worker_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for TokioTimerDriver {
    fn drop(&mut self) {
        self.cancel();
    }
}
