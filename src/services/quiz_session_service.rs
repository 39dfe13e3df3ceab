use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::watch;
use validator::Validate;

use crate::{
    constants::exam::{REAL_EXAM_DURATION_SECS, TICK_PERIOD},
    errors::{AppError, AppResult},
    models::domain::{
        exam_mode::ExamMode,
        quiz_session::{QuizScreen, QuizSession},
        user_answer::UserAnswer,
        Question,
    },
    models::dto::quiz_settings::QuizSettings,
    services::{
        clock::Clock,
        grading_service::GradingService,
        question_service::sample_questions,
        timer_driver::{TickCallback, TimerDriver},
    },
};

/// Session plus the id of the timer run allowed to tick it.
struct SessionCell {
    session: QuizSession,
    active_run: Option<u64>,
    next_run: u64,
}

struct SessionInner {
    cell: Mutex<SessionCell>,
    timer: Arc<dyn TimerDriver>,
    clock: Arc<dyn Clock>,
    notifier: watch::Sender<QuizSession>,
}

/// Owner of the quiz session. Every user intent and every timer tick goes
/// through the same lock, and a fresh snapshot is published after each change.
#[derive(Clone)]
pub struct QuizSessionService {
    inner: Arc<SessionInner>,
}

impl QuizSessionService {
    pub fn new(timer: Arc<dyn TimerDriver>, clock: Arc<dyn Clock>) -> Self {
        let (notifier, _) = watch::channel(QuizSession::default());
        Self {
            inner: Arc::new(SessionInner {
                cell: Mutex::new(SessionCell {
                    session: QuizSession::default(),
                    active_run: None,
                    next_run: 0,
                }),
                timer,
                clock,
                notifier,
            }),
        }
    }

    pub fn snapshot(&self) -> QuizSession {
        self.inner.lock().session.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QuizSession> {
        self.inner.notifier.subscribe()
    }

    pub fn load_questions(
        &self,
        all_questions: &[Question],
        requested_count: usize,
        time_per_question: u32,
        exam_mode: ExamMode,
    ) {
        self.load_questions_with_rng(
            all_questions,
            requested_count,
            time_per_question,
            exam_mode,
            &mut rand::thread_rng(),
        )
    }

    pub fn load_questions_with_rng<R: Rng + ?Sized>(
        &self,
        all_questions: &[Question],
        requested_count: usize,
        time_per_question: u32,
        exam_mode: ExamMode,
        rng: &mut R,
    ) {
        let questions = sample_questions(all_questions, requested_count, rng);
        let now = self.inner.clock.now();

        let mut cell = self.inner.lock();
        self.inner.stop_timer(&mut cell);
        cell.session.questions = questions;
        reset_run(
            &mut cell.session,
            requested_count,
            time_per_question,
            exam_mode,
            now,
        );
        cell.session.screen = QuizScreen::Start;

        log::info!(
            "Loaded {} of {} questions ({} mode)",
            cell.session.questions.len(),
            all_questions.len(),
            exam_mode
        );
        self.inner.publish(&cell);
    }

    pub fn start_quiz(
        &self,
        requested_count: usize,
        time_per_question: u32,
        exam_mode: ExamMode,
    ) -> AppResult<()> {
        let now = self.inner.clock.now();
        let mut cell = self.inner.lock();
        if cell.session.questions.is_empty() {
            return Err(AppError::InvalidState(
                "Cannot start a quiz without questions".to_string(),
            ));
        }

        self.inner.stop_timer(&mut cell);
        reset_run(
            &mut cell.session,
            requested_count,
            time_per_question,
            exam_mode,
            now,
        );
        cell.session.screen = QuizScreen::Quiz;
        self.inner.start_timer(&mut cell);

        log::info!(
            "Quiz started: {} questions, {} mode, {}",
            cell.session.questions.len(),
            exam_mode,
            cell.session.time_remaining_formatted()
        );
        self.inner.publish(&cell);
        Ok(())
    }

    /// Validate the start-screen settings, then load and start in one step.
    pub fn begin(&self, all_questions: &[Question], settings: &QuizSettings) -> AppResult<()> {
        settings.validate()?;
        self.load_questions(
            all_questions,
            settings.question_count,
            settings.time_per_question_secs,
            settings.exam_mode,
        );
        self.start_quiz(
            settings.question_count,
            settings.time_per_question_secs,
            settings.exam_mode,
        )
    }

    pub fn select_answer(&self, key: impl Into<String>) -> AppResult<()> {
        let mut cell = self.inner.lock();
        ensure_answerable(&cell.session)?;
        cell.session.selected_answer = Some(key.into());
        self.inner.publish(&cell);
        Ok(())
    }

    pub fn select_multiple_answers<I, S>(&self, keys: I) -> AppResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cell = self.inner.lock();
        ensure_answerable(&cell.session)?;
        cell.session.selected_answers = keys.into_iter().map(Into::into).collect();
        self.inner.publish(&cell);
        Ok(())
    }

    /// Grade the active question and record the answer. Returns whether it was correct.
    pub fn submit_answer(&self) -> AppResult<bool> {
        let mut cell = self.inner.lock();
        ensure_answerable(&cell.session)?;
        let is_correct = self.inner.record_answer(&mut cell);
        self.inner.publish(&cell);
        Ok(is_correct)
    }

    pub fn next_question(&self) -> AppResult<()> {
        let now = self.inner.clock.now();
        let mut cell = self.inner.lock();
        if !cell.session.is_in_play() {
            return Err(AppError::InvalidState("No quiz in progress".to_string()));
        }

        if cell.session.is_last_question() {
            self.inner.complete(&mut cell);
        } else {
            let session = &mut cell.session;
            session.current_index += 1;
            session.selected_answer = None;
            session.selected_answers.clear();
            session.show_result = false;
            session.question_started_at = now;
            session.time_remaining_for_question = match session.exam_mode {
                ExamMode::Practice => session.time_per_question_secs,
                ExamMode::RealExam => 0,
            };
            if session.exam_mode == ExamMode::Practice {
                self.inner.start_timer(&mut cell);
            }
        }

        self.inner.publish(&cell);
        Ok(())
    }

    /// Back to the start screen with a clean slate; the loaded questions stay.
    pub fn restart_quiz(&self) {
        let now = self.inner.clock.now();
        let mut cell = self.inner.lock();
        self.inner.stop_timer(&mut cell);

        let session = &mut cell.session;
        let (count, per_question, mode) = (
            session.requested_question_count,
            session.time_per_question_secs,
            session.exam_mode,
        );
        reset_run(session, count, per_question, mode, now);
        session.screen = QuizScreen::Start;

        log::info!("Quiz restarted");
        self.inner.publish(&cell);
    }

    /// Leave the current run without discarding the recorded answers.
    pub fn go_back_to_start(&self) {
        let now = self.inner.clock.now();
        let mut cell = self.inner.lock();
        self.inner.stop_timer(&mut cell);

        let session = &mut cell.session;
        let answers = std::mem::take(&mut session.user_answers);
        let (count, per_question, mode) = (
            session.requested_question_count,
            session.time_per_question_secs,
            session.exam_mode,
        );
        reset_run(session, count, per_question, mode, now);
        session.score = answers.iter().filter(|a| a.is_correct).count();
        session.user_answers = answers;
        session.screen = QuizScreen::Start;

        self.inner.publish(&cell);
    }

    pub fn is_timer_running(&self) -> bool {
        self.inner.lock().active_run.is_some()
    }
}

impl SessionInner {
    fn lock(&self) -> MutexGuard<'_, SessionCell> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, cell: &SessionCell) {
        self.notifier.send_replace(cell.session.clone());
    }

    fn start_timer(self: &Arc<Self>, cell: &mut SessionCell) {
        cell.next_run += 1;
        let run = cell.next_run;
        cell.active_run = Some(run);

        let weak = Arc::downgrade(self);
        let on_tick: TickCallback = Arc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.tick(run);
            }
        });
        self.timer.start(TICK_PERIOD, on_tick);
        log::debug!("Timer run {} started", run);
    }

    fn stop_timer(&self, cell: &mut SessionCell) {
        if let Some(run) = cell.active_run.take() {
            log::debug!("Timer run {} stopped", run);
        }
        self.timer.cancel();
    }

    fn tick(&self, run: u64) {
        let mut cell = self.lock();
        // stale tick from a cancelled run
        if cell.active_run != Some(run) {
            return;
        }

        let session = &mut cell.session;
        if !session.is_in_play() {
            self.stop_timer(&mut cell);
            self.publish(&cell);
            return;
        }

        match session.exam_mode {
            ExamMode::Practice => {
                if session.show_result {
                    return;
                }
                if session.time_remaining_for_question > 0 {
                    session.time_remaining_for_question -= 1;
                } else if session.current_question().is_some() {
                    log::info!(
                        "Time expired on question {}, submitting",
                        session.current_index + 1
                    );
                    self.record_answer(&mut cell);
                } else {
                    self.stop_timer(&mut cell);
                }
            }
            ExamMode::RealExam => {
                if session.total_time_remaining > 0 {
                    session.total_time_remaining -= 1;
                } else {
                    log::info!("Exam time is up");
                    self.complete(&mut cell);
                }
            }
        }

        self.publish(&cell);
    }

    /// Grade and append the active question's answer. Caller checks that one exists.
    fn record_answer(&self, cell: &mut SessionCell) -> bool {
        let session = &mut cell.session;
        let Some(question) = session.current_question().cloned() else {
            return false;
        };

        let time_spent = match session.exam_mode {
            ExamMode::Practice => session
                .time_per_question_secs
                .saturating_sub(session.time_remaining_for_question),
            ExamMode::RealExam => elapsed_secs(session.question_started_at, self.clock.now()),
        };
        let is_correct = GradingService::grade(
            &question,
            session.selected_answer.as_deref(),
            &session.selected_answers,
        );

        session.user_answers.push(UserAnswer::capture(
            &question,
            session.selected_answer.clone(),
            session.selected_answers.clone(),
            is_correct,
            time_spent,
        ));
        if is_correct {
            session.score += 1;
        }
        log::debug!(
            "Question {} answered ({}) in {}s",
            question.id,
            if is_correct { "correct" } else { "incorrect" },
            time_spent
        );

        if session.exam_mode.shows_immediate_feedback() {
            session.show_result = true;
            self.stop_timer(cell);
        }
        is_correct
    }

    fn complete(&self, cell: &mut SessionCell) {
        self.stop_timer(cell);
        let session = &mut cell.session;
        session.quiz_completed = true;
        session.screen = QuizScreen::Result;

        log::info!(
            "Quiz completed: {}/{} correct, exam score {} ({})",
            session.score,
            session.questions.len(),
            session.exam_score(),
            if session.passed_exam() { "passed" } else { "failed" }
        );
    }
}

/// Clear every run-scoped field and apply the run configuration.
fn reset_run(
    session: &mut QuizSession,
    requested_count: usize,
    time_per_question: u32,
    exam_mode: ExamMode,
    now: DateTime<Utc>,
) {
    session.current_index = 0;
    session.score = 0;
    session.selected_answer = None;
    session.selected_answers.clear();
    session.show_result = false;
    session.quiz_completed = false;
    session.user_answers.clear();
    session.exam_mode = exam_mode;
    session.requested_question_count = requested_count;
    session.time_per_question_secs = time_per_question;
    session.question_started_at = now;

    match exam_mode {
        ExamMode::Practice => {
            session.time_remaining_for_question = time_per_question;
            session.total_time_remaining = u32::try_from(requested_count)
                .unwrap_or(u32::MAX)
                .saturating_mul(time_per_question);
        }
        ExamMode::RealExam => {
            session.time_remaining_for_question = 0;
            session.total_time_remaining = REAL_EXAM_DURATION_SECS;
        }
    }
}

fn ensure_answerable(session: &QuizSession) -> AppResult<()> {
    if !session.is_in_play() {
        return Err(AppError::InvalidState("No quiz in progress".to_string()));
    }
    if session.current_question().is_none() {
        return Err(AppError::InvalidState("No active question".to_string()));
    }
    if session.is_current_answered() {
        return Err(AppError::InvalidState(
            "The current question was already answered".to_string(),
        ));
    }
    Ok(())
}

fn elapsed_secs(since: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    u32::try_from((now - since).num_seconds().max(0)).unwrap_or(u32::MAX)
}
