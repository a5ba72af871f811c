//! Answer grading and the Score Classifier.

use std::collections::HashSet;

use crate::db::models::{QuestionRow, ScoreBandRow};
use crate::models::{AnswerValue, QuestionRole, QuestionType};
use crate::names;

/// Whether `answer` matches `correct` under the question's grading rule:
/// single-choice requires exact equality, multiple-choice compares the two
/// index sets. A shape mismatch (e.g. a bare index for a multiple-choice
/// question) grades as incorrect.
pub fn is_correct(
    question_type: QuestionType,
    answer: &AnswerValue,
    correct: &AnswerValue,
) -> bool {
    match question_type {
        QuestionType::Single => answer == correct,
        QuestionType::Multiple => match (answer, correct) {
            (AnswerValue::Multiple(a), AnswerValue::Multiple(c)) => {
                let a: HashSet<i64> = a.iter().copied().collect();
                let c: HashSet<i64> = c.iter().copied().collect();
                a == c
            }
            _ => false,
        },
    }
}

/// Grades one answer against its question. `Some(result)` for scored
/// questions, `None` for everything else (stored as ungraded).
pub fn grade(question: &QuestionRow, answer: &AnswerValue) -> Option<bool> {
    if question.role() != QuestionRole::Scored {
        return None;
    }

    let correct = match question.correct_answer() {
        Some(correct) => correct,
        // A scored question without a stored answer can never be right.
        None => return Some(false),
    };

    Some(is_correct(question.question_type(), answer, &correct))
}

/// Resolves a score to the level name of the first band (storage order)
/// whose inclusive range contains it. Callers pass active bands only; the
/// first-match rule is what makes an overlap violation deterministic.
pub fn classify(bands: &[ScoreBandRow], score: i64) -> &str {
    bands
        .iter()
        .find(|b| b.is_active && b.min_score <= score && score <= b.max_score)
        .map(|b| b.level_name.as_str())
        .unwrap_or(names::UNCLASSIFIED_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(id: i64, level_name: &str, min_score: i64, max_score: i64) -> ScoreBandRow {
        let now = chrono::Utc::now().naive_utc();
        ScoreBandRow {
            id,
            level_name: level_name.to_string(),
            min_score,
            max_score,
            description: None,
            is_active: true,
            display_order: id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn single_choice_requires_exact_match() {
        assert!(is_correct(
            QuestionType::Single,
            &AnswerValue::Single(2),
            &AnswerValue::Single(2)
        ));
        assert!(!is_correct(
            QuestionType::Single,
            &AnswerValue::Single(1),
            &AnswerValue::Single(2)
        ));
        // A list answer is never equal to a single correct index.
        assert!(!is_correct(
            QuestionType::Single,
            &AnswerValue::Multiple(vec![2]),
            &AnswerValue::Single(2)
        ));
    }

    #[test]
    fn multiple_choice_compares_sets() {
        assert!(is_correct(
            QuestionType::Multiple,
            &AnswerValue::Multiple(vec![2, 0, 1]),
            &AnswerValue::Multiple(vec![0, 1, 2])
        ));
        assert!(!is_correct(
            QuestionType::Multiple,
            &AnswerValue::Multiple(vec![0, 1]),
            &AnswerValue::Multiple(vec![0, 1, 2])
        ));
        assert!(!is_correct(
            QuestionType::Multiple,
            &AnswerValue::Single(0),
            &AnswerValue::Multiple(vec![0])
        ));
    }

    #[test]
    fn classify_picks_containing_band() {
        let bands = vec![
            band(1, "新手", 0, 9),
            band(2, "進階", 10, 14),
            band(3, "高階", 15, 17),
        ];

        assert_eq!(classify(&bands, 0), "新手");
        assert_eq!(classify(&bands, 10), "進階");
        assert_eq!(classify(&bands, 17), "高階");
    }

    #[test]
    fn classify_is_total_over_the_score_range() {
        let bands = vec![
            band(1, "新手", 0, 9),
            band(2, "進階", 10, 14),
            band(3, "高階", 15, 17),
        ];

        for score in 0..=17 {
            assert_ne!(classify(&bands, score), names::UNCLASSIFIED_LEVEL);
        }
    }

    #[test]
    fn uncovered_score_is_unclassified() {
        let bands = vec![band(1, "新手", 0, 9)];
        assert_eq!(classify(&bands, 12), names::UNCLASSIFIED_LEVEL);
        assert_eq!(classify(&[], 3), names::UNCLASSIFIED_LEVEL);
    }

    #[test]
    fn overlapping_bands_resolve_to_first_in_storage_order() {
        let bands = vec![band(1, "甲", 0, 10), band(2, "乙", 5, 15)];
        assert_eq!(classify(&bands, 7), "甲");
    }

    #[test]
    fn inactive_bands_are_skipped() {
        let mut inactive = band(1, "新手", 0, 9);
        inactive.is_active = false;
        let bands = vec![inactive, band(2, "進階", 0, 17)];
        assert_eq!(classify(&bands, 3), "進階");
    }
}
