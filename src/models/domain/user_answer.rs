use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::domain::question::{ExamDomain, Question, QuestionType};

/// Snapshot of one submitted answer. Copies everything it needs from the
/// question so later changes to the question set do not affect it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserAnswer {
    pub question_id: u32,
    pub selected_answer: Option<String>,
    pub selected_answers: BTreeSet<String>,
    pub correct_answer: String,
    pub correct_answers: Vec<String>, // multi-select only
    pub is_correct: bool,
    pub time_spent_secs: u32,
    pub question_text: String,
    pub question_type: QuestionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<ExamDomain>,
}

impl UserAnswer {
    pub fn capture(
        question: &Question,
        selected_answer: Option<String>,
        selected_answers: BTreeSet<String>,
        is_correct: bool,
        time_spent_secs: u32,
    ) -> Self {
        let correct_answers = if question.question_type.is_multi_select() {
            question.correct_answer_keys()
        } else {
            Vec::new()
        };

        UserAnswer {
            question_id: question.id,
            selected_answer,
            selected_answers,
            correct_answer: question.correct_answer.clone(),
            correct_answers,
            is_correct,
            time_spent_secs,
            question_text: question.prompt.clone(),
            question_type: question.question_type,
            domain: question.domain,
        }
    }

    /// What the user picked, formatted for the summary. `None` when nothing was chosen.
    pub fn answer_label(&self) -> Option<String> {
        if self.question_type.is_multi_select() {
            if self.selected_answers.is_empty() {
                None
            } else {
                Some(
                    self.selected_answers
                        .iter()
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", "),
                )
            }
        } else {
            self.selected_answer.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn make_question(question_type: QuestionType, correct_answer: &str) -> Question {
        let mut options = IndexMap::new();
        options.insert("A".to_string(), "Alpha".to_string());
        options.insert("B".to_string(), "Beta".to_string());
        options.insert("C".to_string(), "Gamma".to_string());

        Question {
            id: 3,
            prompt: "Pick wisely".to_string(),
            options,
            correct_answer: correct_answer.to_string(),
            question_type,
            domain: Some(ExamDomain::CoreSolutions),
            explanation: None,
        }
    }

    #[test]
    fn capture_is_independent_of_later_question_changes() {
        let mut question = make_question(QuestionType::SingleChoice, "B");
        let answer = UserAnswer::capture(&question, Some("B".into()), BTreeSet::new(), true, 12);

        question.prompt = "Edited".to_string();
        question.correct_answer = "C".to_string();

        assert_eq!(answer.question_text, "Pick wisely");
        assert_eq!(answer.correct_answer, "B");
        assert_eq!(answer.domain, Some(ExamDomain::CoreSolutions));
        assert!(answer.correct_answers.is_empty());
    }

    #[test]
    fn capture_records_correct_keys_for_multi_select() {
        let question = make_question(QuestionType::MultipleChoice, "A,C");
        let selected: BTreeSet<String> = ["C".to_string()].into_iter().collect();

        let answer = UserAnswer::capture(&question, None, selected, false, 4);

        assert_eq!(answer.correct_answers, vec!["A", "C"]);
        assert_eq!(answer.answer_label().as_deref(), Some("C"));
    }

    #[test]
    fn answer_label_is_none_without_selection() {
        let question = make_question(QuestionType::TrueFalse, "A");
        let answer = UserAnswer::capture(&question, None, BTreeSet::new(), false, 60);
        assert_eq!(answer.answer_label(), None);
    }
}
