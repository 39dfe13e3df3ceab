use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::constants::exam::{
    DEFAULT_QUESTION_COUNT, DEFAULT_TIME_PER_QUESTION_SECS, QUESTION_COUNT_CHOICES,
    TIME_PER_QUESTION_CHOICES,
};
use crate::models::domain::exam_mode::ExamMode;

/// Options the user picks on the start screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct QuizSettings {
    #[validate(custom(function = validate_question_count))]
    pub question_count: usize,

    // only meaningful in practice mode
    #[validate(custom(function = validate_time_per_question))]
    pub time_per_question_secs: u32,

    pub exam_mode: ExamMode,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            time_per_question_secs: DEFAULT_TIME_PER_QUESTION_SECS,
            exam_mode: ExamMode::Practice,
        }
    }
}

fn validate_question_count(count: usize) -> Result<(), ValidationError> {
    if !QUESTION_COUNT_CHOICES.contains(&count) {
        return Err(ValidationError::new("unsupported_question_count"));
    }
    Ok(())
}

fn validate_time_per_question(secs: u32) -> Result<(), ValidationError> {
    if !TIME_PER_QUESTION_CHOICES.contains(&secs) {
        return Err(ValidationError::new("unsupported_time_per_question"));
    }
    Ok(())
}
