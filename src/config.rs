use std::env;
use std::str::FromStr;

use validator::Validate;

use crate::{
    constants::exam::{DEFAULT_QUESTIONS_URL, DEFAULT_QUESTION_COUNT, DEFAULT_TIME_PER_QUESTION_SECS},
    errors::{AppError, AppResult},
    models::{domain::ExamMode, dto::QuizSettings},
};

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub questions_url: String,
    pub http_timeout_secs: u64,
    pub question_count: usize,
    pub time_per_question_secs: u32,
    pub exam_mode: ExamMode,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            questions_url: env::var("QUIZ_QUESTIONS_URL")
                .unwrap_or_else(|_| DEFAULT_QUESTIONS_URL.to_string()),
            http_timeout_secs: parse_var("QUIZ_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
            question_count: parse_var("QUIZ_QUESTION_COUNT", DEFAULT_QUESTION_COUNT)?,
            time_per_question_secs: parse_var(
                "QUIZ_TIME_PER_QUESTION_SECS",
                DEFAULT_TIME_PER_QUESTION_SECS,
            )?,
            exam_mode: parse_var("QUIZ_EXAM_MODE", ExamMode::Practice)?,
        })
    }

    /// Start-screen settings seeded from the environment.
    pub fn quiz_settings(&self) -> AppResult<QuizSettings> {
        let settings = QuizSettings {
            question_count: self.question_count,
            time_per_question_secs: self.time_per_question_secs,
            exam_mode: self.exam_mode,
        };
        settings.validate()?;
        Ok(settings)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            questions_url: "http://127.0.0.1:8080/questions.json".to_string(),
            http_timeout_secs: 2,
            question_count: 10,
            time_per_question_secs: 30,
            exam_mode: ExamMode::Practice,
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|e| {
            AppError::Configuration(format!("Invalid value {:?} for {}: {}", raw, name, e))
        }),
        _ => Ok(default),
    }
}
