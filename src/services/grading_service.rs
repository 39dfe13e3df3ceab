use std::collections::BTreeSet;

use crate::models::domain::question::{Question, QuestionType};

pub struct GradingService;

impl GradingService {
    /// Grade a selection against a question based on its type
    pub fn grade(
        question: &Question,
        selected_answer: Option<&str>,
        selected_answers: &BTreeSet<String>,
    ) -> bool {
        match question.question_type {
            QuestionType::MultipleChoice => {
                // Order independent; an empty selection only matches an empty key list
                let correct: BTreeSet<String> =
                    question.correct_answer_keys().into_iter().collect();
                let selected: BTreeSet<String> = selected_answers
                    .iter()
                    .map(|key| key.trim().to_string())
                    .collect();
                selected == correct
            }
            QuestionType::SingleChoice
            | QuestionType::TrueFalse
            | QuestionType::Matching
            | QuestionType::DragDrop
            | QuestionType::CaseStudy => selected_answer == Some(question.correct_answer.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn question(question_type: QuestionType, correct_answer: &str) -> Question {
        let options: IndexMap<String, String> = ["A", "B", "C", "D"]
            .iter()
            .map(|k| (k.to_string(), format!("Option {}", k)))
            .collect();
        Question {
            id: 1,
            prompt: "Which?".to_string(),
            options,
            correct_answer: correct_answer.to_string(),
            question_type,
            domain: None,
            explanation: None,
        }
    }

    fn keys(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn single_choice_requires_exact_match() {
        let q = question(QuestionType::SingleChoice, "B");
        assert!(GradingService::grade(&q, Some("B"), &BTreeSet::new()));
        assert!(!GradingService::grade(&q, Some("b"), &BTreeSet::new()));
        assert!(!GradingService::grade(&q, Some("A"), &BTreeSet::new()));
        assert!(!GradingService::grade(&q, None, &BTreeSet::new()));
    }

    #[test]
    fn true_false_grades_like_single_choice() {
        let q = question(QuestionType::TrueFalse, "A");
        assert!(GradingService::grade(&q, Some("A"), &BTreeSet::new()));
        assert!(!GradingService::grade(&q, Some("B"), &BTreeSet::new()));
    }

    #[test]
    fn other_types_fall_back_to_single_choice_equality() {
        for question_type in [
            QuestionType::Matching,
            QuestionType::DragDrop,
            QuestionType::CaseStudy,
        ] {
            let q = question(question_type, "C");
            assert!(GradingService::grade(&q, Some("C"), &BTreeSet::new()));
            assert!(!GradingService::grade(&q, None, &keys(&["C"])));
        }
    }

    #[test]
    fn out_of_range_key_is_simply_incorrect() {
        let q = question(QuestionType::SingleChoice, "A");
        assert!(!GradingService::grade(&q, Some("Z"), &BTreeSet::new()));
    }

    #[test]
    fn multiple_choice_is_order_independent() {
        let q = question(QuestionType::MultipleChoice, "A,C");
        assert!(GradingService::grade(&q, None, &keys(&["C", "A"])));
    }

    #[test]
    fn multiple_choice_trims_correct_keys() {
        let q = question(QuestionType::MultipleChoice, " B , D ");
        assert!(GradingService::grade(&q, None, &keys(&["D", "B"])));
    }

    #[test]
    fn multiple_choice_rejects_partial_and_extra_selections() {
        let q = question(QuestionType::MultipleChoice, "A,C");
        assert!(!GradingService::grade(&q, None, &keys(&["A"])));
        assert!(!GradingService::grade(&q, None, &keys(&["A", "B", "C"])));
        assert!(!GradingService::grade(&q, None, &BTreeSet::new()));
    }

    #[test]
    fn multiple_choice_ignores_single_selection_field() {
        let q = question(QuestionType::MultipleChoice, "A");
        assert!(!GradingService::grade(&q, Some("A"), &BTreeSet::new()));
    }

    #[test]
    fn multiple_choice_empty_selection_matches_empty_correct_set() {
        let q = question(QuestionType::MultipleChoice, "");
        assert!(GradingService::grade(&q, None, &BTreeSet::new()));
        assert!(!GradingService::grade(&q, None, &keys(&["A"])));
    }
}
