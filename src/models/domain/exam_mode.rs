use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamMode {
    /// Per-question countdown with immediate feedback.
    #[default]
    Practice,
    /// One countdown for the whole attempt; feedback only in the summary.
    RealExam,
}

impl ExamMode {
    pub fn shows_immediate_feedback(&self) -> bool {
        matches!(self, ExamMode::Practice)
    }
}

impl fmt::Display for ExamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExamMode::Practice => write!(f, "practice"),
            ExamMode::RealExam => write!(f, "real_exam"),
        }
    }
}

impl FromStr for ExamMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "practice" => Ok(ExamMode::Practice),
            "real_exam" | "exam" => Ok(ExamMode::RealExam),
            other => Err(AppError::Configuration(format!(
                "Unknown exam mode '{}'",
                other
            ))),
        }
    }
}
