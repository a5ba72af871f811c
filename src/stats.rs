//! Response aggregation shared by the stats endpoints and both exporters.
//! Works over rows the caller already loaded; the catalog is small enough
//! (tens of questions, one row per answer) that in-memory scans are fine.

use std::collections::HashMap;

use serde::Serialize;

use crate::db::models::{QuestionRow, ResponseRow};
use crate::models::{AnswerValue, QuestionRole};

#[derive(Serialize)]
pub struct OptionStat {
    pub option: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Serialize)]
pub struct QuestionStat {
    pub id: i64,
    pub order: i64,
    pub content: String,
    pub question_type: String,
    pub correct_rate: f64,
    pub correct_answers: usize,
    pub total_answers: usize,
    pub option_stats: Vec<OptionStat>,
    /// Role marker for the exporters; not part of the JSON payload.
    #[serde(skip)]
    pub scored: bool,
}

#[derive(Serialize)]
pub struct ScoreBucket {
    pub score: i64,
    pub count: usize,
    pub percentage: f64,
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn distinct_sessions(responses: &[ResponseRow]) -> usize {
    let mut sessions: Vec<&str> = responses.iter().map(|r| r.session_id.as_str()).collect();
    sessions.sort_unstable();
    sessions.dedup();
    sessions.len()
}

/// Correct-answer count per session, over graded answers only.
pub fn session_scores(responses: &[ResponseRow]) -> HashMap<String, i64> {
    let mut scores: HashMap<String, i64> = HashMap::new();

    for response in responses {
        if let Some(is_correct) = response.is_correct {
            let entry = scores.entry(response.session_id.clone()).or_insert(0);
            if is_correct {
                *entry += 1;
            }
        }
    }

    scores
}

pub fn average_score(scores: &HashMap<String, i64>) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.values().sum::<i64>() as f64 / scores.len() as f64
}

/// Per-question breakdown: correct rate (scored questions only) and how
/// often each option was picked.
pub fn question_breakdown(
    questions: &[QuestionRow],
    responses: &[ResponseRow],
) -> Vec<QuestionStat> {
    questions
        .iter()
        .map(|question| {
            let question_responses: Vec<&ResponseRow> = responses
                .iter()
                .filter(|r| r.question_id == question.id)
                .collect();
            let total_answers = question_responses.len();

            let (correct_answers, correct_rate) = if question.role() == QuestionRole::Scored {
                let correct = question_responses
                    .iter()
                    .filter(|r| r.is_correct == Some(true))
                    .count();
                let rate = if total_answers > 0 {
                    round1(correct as f64 / total_answers as f64 * 100.0)
                } else {
                    0.0
                };
                (correct, rate)
            } else {
                (0, 0.0)
            };

            let option_stats = if total_answers > 0 {
                question
                    .options()
                    .into_iter()
                    .enumerate()
                    .map(|(index, option)| {
                        let index = index as i64;
                        let count = question_responses
                            .iter()
                            .filter(|r| option_selected(r.answer().as_ref(), index))
                            .count();
                        OptionStat {
                            option,
                            count,
                            percentage: round1(count as f64 / total_answers as f64 * 100.0),
                        }
                    })
                    .collect()
            } else {
                Vec::new()
            };

            QuestionStat {
                id: question.id,
                order: question.display_order,
                content: question.content.clone(),
                question_type: question.question_type.clone(),
                correct_rate,
                correct_answers,
                total_answers,
                option_stats,
                scored: question.role() == QuestionRole::Scored,
            }
        })
        .collect()
}

fn option_selected(answer: Option<&AnswerValue>, index: i64) -> bool {
    match answer {
        Some(AnswerValue::Single(selected)) => *selected == index,
        Some(AnswerValue::Multiple(selected)) => selected.contains(&index),
        None => false,
    }
}

/// Session-score histogram over `0..=max_score`.
pub fn score_distribution(scores: &HashMap<String, i64>, max_score: i64) -> Vec<ScoreBucket> {
    let total = scores.len();

    (0..=max_score)
        .map(|score| {
            let count = scores.values().filter(|&&s| s == score).count();
            let percentage = if total > 0 {
                round1(count as f64 / total as f64 * 100.0)
            } else {
                0.0
            };
            ScoreBucket {
                score,
                count,
                percentage,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(session: &str, question_id: i64, answer: &str, is_correct: Option<bool>) -> ResponseRow {
        ResponseRow {
            id: 0,
            session_id: session.to_string(),
            question_id,
            answer: answer.to_string(),
            is_correct,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    fn question(id: i64, role: &str, options: &str) -> QuestionRow {
        QuestionRow {
            id,
            content: format!("Q{id}"),
            question_type: "single".to_string(),
            role: role.to_string(),
            display_order: id,
            options: options.to_string(),
            correct_answer: Some("0".to_string()),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn sessions_and_scores_are_grouped_by_token() {
        let responses = vec![
            response("a", 1, "0", Some(true)),
            response("a", 2, "1", Some(false)),
            response("b", 1, "0", Some(true)),
            response("b", 2, "0", Some(true)),
        ];

        assert_eq!(distinct_sessions(&responses), 2);

        let scores = session_scores(&responses);
        assert_eq!(scores["a"], 1);
        assert_eq!(scores["b"], 2);
        assert_eq!(average_score(&scores), 1.5);
    }

    #[test]
    fn ungraded_rows_do_not_create_sessions_in_scores() {
        let responses = vec![response("a", 3, "[0,1]", None)];
        assert!(session_scores(&responses).is_empty());
        assert_eq!(distinct_sessions(&responses), 1);
    }

    #[test]
    fn breakdown_counts_options_for_both_answer_shapes() {
        let questions = vec![question(1, "scored", r#"["甲","乙"]"#)];
        let responses = vec![
            response("a", 1, "0", Some(true)),
            response("b", 1, "[0,1]", Some(false)),
        ];

        let breakdown = question_breakdown(&questions, &responses);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].total_answers, 2);
        assert_eq!(breakdown[0].correct_answers, 1);
        assert_eq!(breakdown[0].correct_rate, 50.0);
        assert_eq!(breakdown[0].option_stats[0].count, 2);
        assert_eq!(breakdown[0].option_stats[1].count, 1);
    }

    #[test]
    fn interest_questions_report_zero_correct_rate() {
        let questions = vec![question(1, "interest_selector", r#"["甲"]"#)];
        let responses = vec![response("a", 1, "[0]", None)];

        let breakdown = question_breakdown(&questions, &responses);
        assert_eq!(breakdown[0].correct_rate, 0.0);
        assert_eq!(breakdown[0].option_stats[0].count, 1);
    }

    #[test]
    fn distribution_covers_every_score() {
        let responses = vec![
            response("a", 1, "0", Some(true)),
            response("b", 1, "1", Some(false)),
        ];
        let scores = session_scores(&responses);
        let distribution = score_distribution(&scores, 2);

        assert_eq!(distribution.len(), 3);
        assert_eq!(distribution[0].count, 1);
        assert_eq!(distribution[1].count, 1);
        assert_eq!(distribution[2].count, 0);
        assert_eq!(distribution[0].percentage, 50.0);
    }
}
