use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::exam::{
    DEFAULT_QUESTION_COUNT, DEFAULT_TIME_PER_QUESTION_SECS, PRACTICE_LOW_TIME_SECS,
    REAL_EXAM_LOW_TIME_SECS,
};
use crate::models::domain::exam_mode::ExamMode;
use crate::models::domain::question::{ExamDomain, Question};
use crate::models::domain::user_answer::UserAnswer;
use crate::services::scoring_service::ScoringService;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizScreen {
    #[default]
    Start,
    Quiz,
    Result,
}

/// State of one quiz attempt. Mutated only by `QuizSessionService`; everything
/// exposed here is a pure read.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizSession {
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub score: usize,
    pub selected_answer: Option<String>,
    pub selected_answers: BTreeSet<String>,
    pub show_result: bool,
    pub quiz_completed: bool,
    pub time_remaining_for_question: u32,
    pub total_time_remaining: u32,
    pub question_started_at: DateTime<Utc>,
    pub user_answers: Vec<UserAnswer>,
    pub exam_mode: ExamMode,
    pub requested_question_count: usize,
    pub time_per_question_secs: u32,
    pub screen: QuizScreen,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self {
            questions: Vec::new(),
            current_index: 0,
            score: 0,
            selected_answer: None,
            selected_answers: BTreeSet::new(),
            show_result: false,
            quiz_completed: false,
            time_remaining_for_question: 0,
            total_time_remaining: 0,
            question_started_at: DateTime::<Utc>::default(),
            user_answers: Vec::new(),
            exam_mode: ExamMode::Practice,
            requested_question_count: DEFAULT_QUESTION_COUNT,
            time_per_question_secs: DEFAULT_TIME_PER_QUESTION_SECS,
            screen: QuizScreen::Start,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DomainResult {
    pub domain: ExamDomain,
    pub answered: usize,
    pub correct: usize,
}

impl QuizSession {
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// True once the active question has an entry in `user_answers`.
    pub fn is_current_answered(&self) -> bool {
        match (self.current_question(), self.user_answers.last()) {
            (Some(question), Some(last)) => last.question_id == question.id,
            _ => false,
        }
    }

    pub fn is_in_play(&self) -> bool {
        self.screen == QuizScreen::Quiz && !self.quiz_completed
    }

    pub fn progress(&self) -> f32 {
        if self.questions.is_empty() {
            return 0.0;
        }
        (self.current_index + 1) as f32 / self.questions.len() as f32
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    pub fn correct_answers(&self) -> Vec<&UserAnswer> {
        self.user_answers.iter().filter(|a| a.is_correct).collect()
    }

    pub fn incorrect_answers(&self) -> Vec<&UserAnswer> {
        self.user_answers.iter().filter(|a| !a.is_correct).collect()
    }

    pub fn last_answer(&self) -> Option<&UserAnswer> {
        self.user_answers.last()
    }

    pub fn unanswered_count(&self) -> usize {
        self.questions.len().saturating_sub(self.user_answers.len())
    }

    pub fn average_time_per_question(&self) -> f64 {
        if self.user_answers.is_empty() {
            return 0.0;
        }
        let total: u64 = self
            .user_answers
            .iter()
            .map(|a| a.time_spent_secs as u64)
            .sum();
        total as f64 / self.user_answers.len() as f64
    }

    pub fn exam_score(&self) -> u32 {
        ScoringService::exam_score(self.score, self.questions.len())
    }

    pub fn passed_exam(&self) -> bool {
        ScoringService::passed(self.exam_score())
    }

    pub fn percentage_correct(&self) -> u32 {
        ScoringService::percentage(self.score, self.questions.len())
    }

    pub fn time_remaining_formatted(&self) -> String {
        match self.exam_mode {
            ExamMode::Practice => format!("{}s", self.time_remaining_for_question),
            ExamMode::RealExam => format!(
                "{}:{:02}",
                self.total_time_remaining / 60,
                self.total_time_remaining % 60
            ),
        }
    }

    pub fn is_time_low(&self) -> bool {
        match self.exam_mode {
            ExamMode::Practice => self.time_remaining_for_question <= PRACTICE_LOW_TIME_SECS,
            ExamMode::RealExam => self.total_time_remaining <= REAL_EXAM_LOW_TIME_SECS,
        }
    }

    /// Answered/correct counts per domain, in taxonomy order.
    pub fn domain_breakdown(&self) -> Vec<DomainResult> {
        ExamDomain::ALL
            .iter()
            .filter_map(|domain| {
                let answers: Vec<&UserAnswer> = self
                    .user_answers
                    .iter()
                    .filter(|a| a.domain == Some(*domain))
                    .collect();
                if answers.is_empty() {
                    return None;
                }
                Some(DomainResult {
                    domain: *domain,
                    answered: answers.len(),
                    correct: answers.iter().filter(|a| a.is_correct).count(),
                })
            })
            .collect()
    }
}
