use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::Question,
    services::question_service::sample_questions,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// The full candidate pool, in document order
    async fn load_all(&self) -> AppResult<Vec<Question>>;

    async fn load_sample(&self, count: usize) -> AppResult<Vec<Question>> {
        let all = self.load_all().await?;
        Ok(sample_questions(&all, count, &mut rand::thread_rng()))
    }

    async fn question_count(&self) -> AppResult<usize> {
        Ok(self.load_all().await?.len())
    }
}

/// Questions served as one JSON array over HTTP(S)
pub struct HttpQuestionRepository {
    client: reqwest::Client,
    url: String,
}

impl HttpQuestionRepository {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            url: config.questions_url.clone(),
        })
    }
}

#[async_trait]
impl QuestionRepository for HttpQuestionRepository {
    async fn load_all(&self) -> AppResult<Vec<Question>> {
        log::info!("Fetching questions from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let questions = parse_questions(&body)?;

        log::info!("Fetched {} questions", questions.len());
        Ok(questions)
    }
}

/// Decode a question document. An empty array is an error.
pub fn parse_questions(body: &str) -> AppResult<Vec<Question>> {
    let questions: Vec<Question> = serde_json::from_str(body)?;
    if questions.is_empty() {
        return Err(AppError::EmptyQuestionSet);
    }
    Ok(questions)
}
