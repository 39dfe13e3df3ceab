use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Question,
    repositories::QuestionRepository,
};

#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
    Loading,
    Ready(Vec<Question>),
    Failed(String),
}

impl LoadState {
    pub fn questions(&self) -> Option<&[Question]> {
        match self {
            LoadState::Ready(questions) => Some(questions),
            _ => None,
        }
    }
}

/// Shuffle a copy of the pool and keep the first `count` questions.
pub fn sample_questions<R: Rng + ?Sized>(
    pool: &[Question],
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut sample = pool.to_vec();
    sample.shuffle(rng);
    sample.truncate(count);
    sample
}

pub struct QuestionService {
    repository: Arc<dyn QuestionRepository>,
    state: RwLock<LoadState>,
}

impl QuestionService {
    pub fn new(repository: Arc<dyn QuestionRepository>) -> Self {
        Self {
            repository,
            state: RwLock::new(LoadState::Loading),
        }
    }

    /// Fetch the candidate pool once. Failures and empty results both end in
    /// `LoadState::Failed`; no partial data is kept.
    pub async fn load(&self) -> LoadState {
        {
            let mut state = self.state.write().await;
            *state = LoadState::Loading;
        }

        let next = match self.fetch().await {
            Ok(questions) => {
                log::info!("Question pool ready with {} questions", questions.len());
                LoadState::Ready(questions)
            }
            Err(err) => {
                log::error!("Failed to load questions: {}", err);
                LoadState::Failed(Self::user_message(&err))
            }
        };

        let mut state = self.state.write().await;
        *state = next.clone();
        next
    }

    pub async fn retry(&self) -> LoadState {
        log::info!("Retrying question load");
        self.load().await
    }

    pub async fn state(&self) -> LoadState {
        self.state.read().await.clone()
    }

    pub async fn questions(&self) -> AppResult<Vec<Question>> {
        match &*self.state.read().await {
            LoadState::Ready(questions) => Ok(questions.clone()),
            LoadState::Loading => Err(AppError::InvalidState(
                "Questions are still loading".to_string(),
            )),
            LoadState::Failed(message) => Err(AppError::LoadFailed(message.clone())),
        }
    }

    async fn fetch(&self) -> AppResult<Vec<Question>> {
        let questions = self.repository.load_all().await?;
        if questions.is_empty() {
            return Err(AppError::EmptyQuestionSet);
        }
        Ok(questions)
    }

    fn user_message(err: &AppError) -> String {
        match err {
            AppError::EmptyQuestionSet => "No questions could be loaded".to_string(),
            other => format!("Error loading questions: {}", other),
        }
    }
}
