use std::error::Error;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::watch;

use az900_quiz::{
    app_state::AppState,
    config::Config,
    models::domain::{ExamMode, QuizSession},
    services::question_service::LoadState,
};

type InputLines = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        log::error!("Quiz aborted: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    let settings = config.quiz_settings()?;
    let state = AppState::new(config)?;
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    let pool = match load_pool(&state, &mut input).await? {
        Some(pool) => pool,
        None => return Ok(()),
    };

    println!(
        "AZ-900 practice quiz: {} questions, {} mode",
        settings.question_count, settings.exam_mode
    );
    println!("Answer with option keys (\"A\" or \"A,C\"), n = next, t = time, r = restart, q = quit");

    let mut updates = state.session.subscribe();
    state.session.begin(&pool, &settings)?;
    play(&state, &mut updates, &mut input).await?;
    Ok(())
}

/// Fetch the pool, offering a retry after each failure. `None` when the user gives up.
async fn load_pool(
    state: &AppState,
    input: &mut InputLines,
) -> Result<Option<Vec<az900_quiz::models::domain::Question>>, Box<dyn Error>> {
    let mut load = state.question_service.load().await;
    loop {
        match load {
            LoadState::Ready(pool) => return Ok(Some(pool)),
            LoadState::Loading => load = state.question_service.load().await,
            LoadState::Failed(message) => {
                println!("{}", message);
                println!("Retry? [y/N]");
                match input.next_line().await? {
                    Some(line) if line.trim().eq_ignore_ascii_case("y") => {
                        load = state.question_service.retry().await;
                    }
                    _ => return Ok(None),
                }
            }
        }
    }
}

async fn play(
    state: &AppState,
    updates: &mut watch::Receiver<QuizSession>,
    input: &mut InputLines,
) -> Result<(), Box<dyn Error>> {
    let session = &state.session;
    let mut shown_question = None;
    let mut shown_answers = 0;

    loop {
        let snapshot = updates.borrow_and_update().clone();

        if snapshot.quiz_completed {
            print_summary(&snapshot);
            return Ok(());
        }
        if snapshot.user_answers.len() > shown_answers {
            shown_answers = snapshot.user_answers.len();
            if snapshot.show_result {
                print_feedback(&snapshot);
            }
        } else if snapshot.user_answers.len() < shown_answers {
            shown_answers = snapshot.user_answers.len();
        }
        if snapshot.is_in_play() && shown_question != Some(snapshot.current_index) {
            shown_question = Some(snapshot.current_index);
            print_question(&snapshot);
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            line = input.next_line() => {
                let Some(line) = line? else {
                    session.restart_quiz();
                    return Ok(());
                };
                match line.trim() {
                    "q" => {
                        session.go_back_to_start();
                        print_summary(&session.snapshot());
                        return Ok(());
                    }
                    "r" => {
                        session.restart_quiz();
                        shown_question = None;
                        session.start_quiz(
                            snapshot.requested_question_count,
                            snapshot.time_per_question_secs,
                            snapshot.exam_mode,
                        )?;
                    }
                    "t" => println!("Time remaining: {}", snapshot.time_remaining_formatted()),
                    "n" | "" => {
                        if let Err(err) = session.next_question() {
                            println!("{}", err);
                        }
                    }
                    keys => answer(state, &snapshot, keys),
                }
            }
        }
    }
}

fn answer(state: &AppState, snapshot: &QuizSession, keys: &str) {
    let session = &state.session;
    let Some(question) = snapshot.current_question() else {
        return;
    };

    let selected = if question.question_type.is_multi_select() {
        let keys: Vec<String> = keys
            .split(',')
            .map(|k| k.trim().to_ascii_uppercase())
            .filter(|k| !k.is_empty())
            .collect();
        session.select_multiple_answers(keys)
    } else {
        session.select_answer(keys.trim().to_ascii_uppercase())
    };

    let submitted = selected.and_then(|_| session.submit_answer());
    match submitted {
        Ok(_) if snapshot.exam_mode == ExamMode::RealExam => {
            if let Err(err) = session.next_question() {
                println!("{}", err);
            }
        }
        Ok(_) => {}
        Err(err) => println!("{}", err),
    }
}

fn print_question(snapshot: &QuizSession) {
    let Some(question) = snapshot.current_question() else {
        return;
    };
    println!();
    println!(
        "Question {}/{} [{}{}]",
        snapshot.current_index + 1,
        snapshot.questions.len(),
        snapshot.time_remaining_formatted(),
        if snapshot.is_time_low() { ", hurry up" } else { "" }
    );
    println!("{}", question.prompt);
    for (key, text) in &question.options {
        println!("  {}) {}", key, text);
    }
    if question.question_type.is_multi_select() {
        println!("  (select all that apply)");
    }
}

fn print_feedback(snapshot: &QuizSession) {
    let Some(answer) = snapshot.last_answer() else {
        return;
    };
    let question = snapshot.current_question();
    if answer.is_correct {
        println!("Correct!");
    } else {
        println!(
            "Incorrect. You chose {}, the answer is {}",
            answer.answer_label().unwrap_or_else(|| "nothing".to_string()),
            answer.correct_answer
        );
        if let Some(text) = question.and_then(|q| q.option_text(&answer.correct_answer)) {
            println!("  {}) {}", answer.correct_answer, text);
        }
    }
    if let Some(explanation) = question.and_then(|q| q.explanation.as_deref()) {
        println!("{}", explanation);
    }
    if snapshot.is_last_question() {
        println!("Press enter to see your results");
    } else {
        println!("Press enter for the next question");
    }
}

fn print_summary(snapshot: &QuizSession) {
    println!();
    println!(
        "Score: {}/{} ({}%)",
        snapshot.score,
        snapshot.questions.len(),
        snapshot.percentage_correct()
    );
    println!(
        "Exam score: {}/1000 - {}",
        snapshot.exam_score(),
        if snapshot.passed_exam() { "PASS" } else { "FAIL" }
    );
    println!(
        "Average time per question: {:.1}s",
        snapshot.average_time_per_question()
    );
    if snapshot.unanswered_count() > 0 {
        println!("Unanswered: {}", snapshot.unanswered_count());
    }
    for result in snapshot.domain_breakdown() {
        println!(
            "  {}: {}/{}",
            result.domain.display_name(),
            result.correct,
            result.answered
        );
    }
    for answer in snapshot.incorrect_answers() {
        println!(
            "  #{} {} (answer: {})",
            answer.question_id, answer.question_text, answer.correct_answer
        );
    }
}
