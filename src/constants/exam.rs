use std::time::Duration;

/// Fixed length of a REAL_EXAM run, independent of the question count.
pub const REAL_EXAM_DURATION_SECS: u32 = 45 * 60;

pub const MAX_EXAM_SCORE: u32 = 1000;
pub const PASSING_EXAM_SCORE: u32 = 700;

pub const DEFAULT_QUESTION_COUNT: usize = 10;
pub const DEFAULT_TIME_PER_QUESTION_SECS: u32 = 60;

pub const QUESTION_COUNT_CHOICES: [usize; 6] = [10, 20, 30, 50, 60, 100];
pub const TIME_PER_QUESTION_CHOICES: [u32; 5] = [30, 45, 60, 90, 120];

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

// Countdown warning thresholds
pub const PRACTICE_LOW_TIME_SECS: u32 = 10;
pub const REAL_EXAM_LOW_TIME_SECS: u32 = 5 * 60;

pub const DEFAULT_QUESTIONS_URL: &str =
    "https://raw.githubusercontent.com/manuelduarte077/AZ900-Quiz/refs/heads/main/api/questions.json";
