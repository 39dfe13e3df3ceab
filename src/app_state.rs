use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    repositories::{HttpQuestionRepository, QuestionRepository},
    services::{
        clock::SystemClock, question_service::QuestionService,
        quiz_session_service::QuizSessionService, timer_driver::TokioTimerDriver,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub question_service: Arc<QuestionService>,
    pub session: QuizSessionService,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the HTTP question source, the tokio tick source and the system clock.
    /// Must be called from inside a tokio runtime.
    pub fn new(config: Config) -> AppResult<Self> {
        let repository = Arc::new(HttpQuestionRepository::new(&config)?);
        Self::with_repository(config, repository)
    }

    pub fn with_repository(
        config: Config,
        repository: Arc<dyn QuestionRepository>,
    ) -> AppResult<Self> {
        let question_service = Arc::new(QuestionService::new(repository));
        let timer = Arc::new(TokioTimerDriver::current()?);
        let session = QuizSessionService::new(timer, Arc::new(SystemClock));

        Ok(Self {
            question_service,
            session,
            config: Arc::new(config),
        })
    }
}
