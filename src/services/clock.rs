use chrono::{DateTime, Utc};

/// Wall-clock source used to measure time spent on REAL_EXAM questions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
