use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use crate::services::clock::Clock;
use crate::services::timer_driver::{TickCallback, TimerDriver};

#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::question::{Question, QuestionType};
    use indexmap::IndexMap;

    fn abcd_options() -> IndexMap<String, String> {
        ["A", "B", "C", "D"]
            .iter()
            .map(|k| (k.to_string(), format!("Option {}", k)))
            .collect()
    }

    /// Single-choice question whose correct key is `correct`
    pub fn single_choice(id: u32, correct: &str) -> Question {
        Question {
            id,
            prompt: format!("Question {}", id),
            options: abcd_options(),
            correct_answer: correct.to_string(),
            question_type: QuestionType::SingleChoice,
            domain: None,
            explanation: None,
        }
    }

    pub fn multiple_choice(id: u32, correct: &str) -> Question {
        Question {
            question_type: QuestionType::MultipleChoice,
            ..single_choice(id, correct)
        }
    }

    /// `count` single-choice questions with ids 1..=count, all answered by "A"
    pub fn sample_questions(count: u32) -> Vec<Question> {
        (1..=count).map(|id| single_choice(id, "A")).collect()
    }
}

/// Timer that only ticks when a test calls `fire`
#[derive(Default)]
pub struct ManualTimerDriver {
    state: Mutex<ManualTimerState>,
}

#[derive(Default)]
struct ManualTimerState {
    active: Option<TickCallback>,
    last_started: Option<TickCallback>,
    starts: usize,
    cancels: usize,
}

impl ManualTimerDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one tick to the active source. Returns false when stopped.
    pub fn fire(&self) -> bool {
        let callback = self.lock().active.clone();
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    pub fn fire_times(&self, times: usize) {
        for _ in 0..times {
            self.fire();
        }
    }

    /// Deliver a tick from the most recently started source even if it was
    /// cancelled, like a tick that was already in flight.
    pub fn fire_stale(&self) {
        let callback = self.lock().last_started.clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn starts(&self) -> usize {
        self.lock().starts
    }

    pub fn cancels(&self) -> usize {
        self.lock().cancels
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualTimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TimerDriver for ManualTimerDriver {
    fn start(&self, _period: Duration, on_tick: TickCallback) {
        let mut state = self.lock();
        state.active = Some(on_tick.clone());
        state.last_started = Some(on_tick);
        state.starts += 1;
    }

    fn cancel(&self) {
        let mut state = self.lock();
        state.active = None;
        state.cancels += 1;
    }

    fn is_running(&self) -> bool {
        self.lock().active.is_some()
    }
}

/// Clock that only moves when a test advances it
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += chrono::Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_fixtures_sample_questions() {
        let questions = sample_questions(3);
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].id, 1);
        assert_eq!(questions[2].id, 3);
        assert_eq!(questions[1].options.len(), 4);
    }

    #[test]
    fn test_manual_timer_fires_only_while_running() {
        let driver = ManualTimerDriver::new();
        let ticks = Arc::new(AtomicUsize::new(0));
        let observed = ticks.clone();

        assert!(!driver.fire());
        driver.start(
            Duration::from_secs(1),
            Arc::new(move || {
                observed.fetch_add(1, Ordering::SeqCst);
            }),
        );
        driver.fire_times(2);
        driver.cancel();
        assert!(!driver.fire());

        driver.fire_stale();
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        assert_eq!(driver.starts(), 1);
        assert_eq!(driver.cancels(), 1);
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance_secs(90);
        assert_eq!((clock.now() - start).num_seconds(), 90);
    }
}
