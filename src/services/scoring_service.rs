use crate::constants::exam::{MAX_EXAM_SCORE, PASSING_EXAM_SCORE};

/// (lower percentage bound, scaled score at that bound)
const SCORE_BRACKETS: [(u64, u64); 5] = [(90, 900), (80, 800), (70, 700), (60, 600), (50, 500)];

pub struct ScoringService;

impl ScoringService {
    /// Map correct/total onto the 0..=1000 exam scale.
    ///
    /// Each bracket maps its 10-point percentage range onto a 100-point score
    /// range; below 50% the score is the percentage times ten. Integer
    /// arithmetic keeps bracket boundaries exact, fractions truncate.
    pub fn exam_score(correct: usize, total: usize) -> u32 {
        if total == 0 {
            return 0;
        }
        let correct = correct as u64;
        let total = total as u64;

        if correct * 100 >= 100 * total {
            return MAX_EXAM_SCORE;
        }

        let scaled = SCORE_BRACKETS
            .iter()
            .find(|(lower, _)| correct * 100 >= lower * total)
            .map(|(lower, base)| base + (correct * 1000 - lower * 10 * total) / total)
            .unwrap_or_else(|| correct * 1000 / total);

        scaled.min(MAX_EXAM_SCORE as u64) as u32
    }

    pub fn passed(exam_score: u32) -> bool {
        exam_score >= PASSING_EXAM_SCORE
    }

    /// Whole-number percentage of correct answers, truncated.
    pub fn percentage(correct: usize, total: usize) -> u32 {
        if total == 0 {
            return 0;
        }
        (correct * 100 / total) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_and_zero_scores() {
        assert_eq!(ScoringService::exam_score(10, 10), 1000);
        assert_eq!(ScoringService::exam_score(0, 10), 0);
    }

    #[test]
    fn empty_quiz_scores_zero() {
        assert_eq!(ScoringService::exam_score(0, 0), 0);
        assert_eq!(ScoringService::percentage(0, 0), 0);
    }

    #[test]
    fn bracket_boundaries_are_exact() {
        assert_eq!(ScoringService::exam_score(9, 10), 900);
        assert_eq!(ScoringService::exam_score(8, 10), 800);
        assert_eq!(ScoringService::exam_score(7, 10), 700);
        assert_eq!(ScoringService::exam_score(6, 10), 600);
        assert_eq!(ScoringService::exam_score(5, 10), 500);
        assert_eq!(ScoringService::exam_score(4, 10), 400);
    }

    #[test]
    fn fractional_percentages_truncate() {
        // 2/3 = 66.67% -> 666
        assert_eq!(ScoringService::exam_score(2, 3), 666);
        // 1/3 = 33.33% -> 333
        assert_eq!(ScoringService::exam_score(1, 3), 333);
        // 59/60 = 98.33% -> 983
        assert_eq!(ScoringService::exam_score(59, 60), 983);
    }

    #[test]
    fn score_is_monotonic_in_correct_answers() {
        for total in [1usize, 3, 7, 10, 20, 30, 50, 60, 100] {
            let mut previous = 0;
            for correct in 0..=total {
                let score = ScoringService::exam_score(correct, total);
                assert!(score >= previous, "{}/{} dropped to {}", correct, total, score);
                assert!(score <= 1000);
                previous = score;
            }
        }
    }

    #[test]
    fn more_correct_than_total_is_clamped() {
        assert_eq!(ScoringService::exam_score(12, 10), 1000);
    }

    #[test]
    fn pass_threshold_is_inclusive() {
        assert!(ScoringService::passed(700));
        assert!(!ScoringService::passed(699));
        assert!(ScoringService::passed(ScoringService::exam_score(7, 10)));
        assert!(!ScoringService::passed(ScoringService::exam_score(69, 100)));
        assert!(ScoringService::passed(ScoringService::exam_score(70, 100)));
    }

    #[test]
    fn passing_matches_seventy_percent() {
        for total in 1..=60usize {
            for correct in 0..=total {
                let passed = ScoringService::passed(ScoringService::exam_score(correct, total));
                assert_eq!(passed, correct * 100 >= 70 * total, "{}/{}", correct, total);
            }
        }
    }

    #[test]
    fn percentage_truncates() {
        assert_eq!(ScoringService::percentage(2, 3), 66);
        assert_eq!(ScoringService::percentage(7, 10), 70);
    }
}
