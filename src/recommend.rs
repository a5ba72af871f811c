//! Course recommendation engine.
//!
//! Re-derives the score and declared interests from the submitted answers
//! (independently of the grading the submission handler already did), then
//! builds a prioritized course list from the active catalog. Degrades to a
//! hardcoded fallback list instead of erroring: a submission result must
//! never lose its recommendations to a storage hiccup.

use std::collections::{HashMap, HashSet};

use crate::db::models::{CourseRow, QuestionRow, RecommendationBounds};
use crate::db::Db;
use crate::models::{AnswerValue, QuestionRole, RecommendedCourse, SubmittedAnswer};
use crate::{names, scoring};

/// Recomputes the raw score and extracts the declared interests.
///
/// Interests come from interest-selector questions: every selected option
/// index is resolved to its option label, in order of appearance, duplicates
/// preserved. Out-of-range indices and non-list answers are skipped.
pub fn derive_inputs(
    questions: &HashMap<i64, QuestionRow>,
    answers: &[SubmittedAnswer],
) -> (i64, Vec<String>) {
    let mut score = 0;

    for answer in answers {
        let Some(question) = questions.get(&answer.question_id) else {
            continue;
        };
        if scoring::grade(question, &answer.answer) == Some(true) {
            score += 1;
        }
    }

    let mut interests = Vec::new();

    for answer in answers {
        let Some(question) = questions.get(&answer.question_id) else {
            continue;
        };
        if question.role() != QuestionRole::InterestSelector {
            continue;
        }

        let AnswerValue::Multiple(selected) = &answer.answer else {
            continue;
        };

        let options = question.options();
        for &index in selected {
            if let Ok(index) = usize::try_from(index) {
                if let Some(label) = options.get(index) {
                    interests.push(label.clone());
                }
            }
        }
    }

    (score, interests)
}

fn rec(course: &CourseRow, priority: i64) -> RecommendedCourse {
    RecommendedCourse {
        title: course.title.clone(),
        category: course.category.clone(),
        description: course.description.clone(),
        level: course.level.clone(),
        priority,
    }
}

/// Builds the recommendation list from a non-empty active catalog.
pub fn build_recommendations(
    catalog: &[CourseRow],
    level: &str,
    interests: &[String],
    bounds: &RecommendationBounds,
) -> Vec<RecommendedCourse> {
    let mut recommended: Vec<RecommendedCourse> = Vec::new();
    let mut used: HashSet<i64> = HashSet::new();

    // Beginners always get the four named courses first, in title-list order.
    if level == names::BEGINNER_LEVEL {
        let mut priority = 1;
        for required_title in names::BEGINNER_REQUIRED_TITLES {
            if let Some(course) = catalog
                .iter()
                .find(|c| !used.contains(&c.id) && c.title.contains(required_title))
            {
                recommended.push(rec(course, priority));
                used.insert(course.id);
                priority += 1;
            }
        }
    }

    // Interest-tag matching. The cap check counts the entire list after each
    // append, not just the current interest's matches, so a scan stops as
    // soon as the total reaches INTEREST_CAP. Kept bug-for-bug compatible
    // with the legacy system; downstream consumers depend on this output.
    for interest in interests {
        for course in catalog {
            if used.contains(&course.id) {
                continue;
            }
            if course.interest_tags().iter().any(|tag| tag == interest) {
                let priority = recommended.len() as i64 + 1;
                recommended.push(rec(course, priority));
                used.insert(course.id);

                if recommended.len() >= names::INTEREST_CAP {
                    break;
                }
            }
        }
    }

    // Pad with unused catalog courses until the minimum is met.
    if (recommended.len() as i64) < bounds.min_courses {
        for course in catalog {
            if (recommended.len() as i64) >= bounds.min_courses {
                break;
            }
            if used.contains(&course.id) {
                continue;
            }
            let priority = recommended.len() as i64 + 1;
            recommended.push(rec(course, priority));
            used.insert(course.id);
        }
    }

    recommended.truncate(bounds.max_courses.max(0) as usize);

    // A no-op given construction order today, but the list is assembled in
    // several passes, so the final order is pinned explicitly.
    recommended.sort_by_key(|c| c.priority);

    recommended
}

fn fixed(title: &str, category: &str, description: &str, level: &str, priority: i64) -> RecommendedCourse {
    RecommendedCourse {
        title: title.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        level: level.to_string(),
        priority,
    }
}

fn fallback_beginner_courses() -> Vec<RecommendedCourse> {
    vec![
        fixed(
            "【新手入門】EOS R系列相機全面操作班",
            "新手入門",
            "全面學習EOS R系列相機的操作技巧",
            "攝影新手",
            1,
        ),
        fixed(
            "【新手入門】基本自動對焦 - 理論班",
            "新手入門",
            "掌握自動對焦的基本理論和應用",
            "攝影新手",
            2,
        ),
        fixed(
            "【新手入門】掌握拍攝設定-拍出準確色彩不求人",
            "新手入門",
            "學習正確的拍攝設定，拍出準確色彩",
            "攝影新手",
            3,
        ),
        fixed(
            "【新手入門】鏡頭配搭實用指南",
            "新手入門",
            "了解不同鏡頭的特性和配搭技巧",
            "攝影新手",
            4,
        ),
    ]
}

fn fallback_portrait_courses() -> Vec<RecommendedCourse> {
    vec![
        fixed(
            "【新手入門】日常人像生活拍攝攻略",
            "新手入門",
            "學習日常人像攝影技巧",
            "攝影新手",
            5,
        ),
        fixed(
            "【進階攝影】人像攝影技能全面解鎖工作坊 (Cherry Wong)",
            "進階攝影",
            "全面提升人像攝影技能",
            "進階攝影師",
            6,
        ),
    ]
}

fn fallback_stage_courses() -> Vec<RecommendedCourse> {
    vec![
        fixed(
            "【新手入門】追星拍攝攻略",
            "新手入門",
            "學習演唱會和舞台攝影技巧",
            "攝影新手",
            5,
        ),
        fixed(
            "【進階攝影】攝動定格：應援攝影工作坊(Cherry Wong)",
            "進階攝影",
            "專業應援攝影技巧",
            "進階攝影師",
            6,
        ),
    ]
}

/// Hardcoded recommendation list used when the catalog is empty or a storage
/// error interrupted the catalog path. Padding in this path draws from the
/// beginner list, not the catalog.
pub fn fallback_courses(
    level: &str,
    interests: &[String],
    bounds: &RecommendationBounds,
) -> Vec<RecommendedCourse> {
    let mut recommended = Vec::new();

    if level == names::BEGINNER_LEVEL {
        recommended.extend(fallback_beginner_courses());
    }

    let has_portrait_interest = interests
        .iter()
        .any(|i| i.contains("人物攝影") || i.contains("人像攝影"));
    let has_stage_interest = interests.iter().any(|i| i.contains("舞台攝影"));

    if has_portrait_interest {
        recommended.extend(fallback_portrait_courses());
    }
    if has_stage_interest {
        recommended.extend(fallback_stage_courses());
    }

    if (recommended.len() as i64) < bounds.min_courses {
        let needed = (bounds.min_courses as usize).saturating_sub(recommended.len());
        recommended.extend(fallback_beginner_courses().into_iter().take(needed));
    }

    recommended.truncate(bounds.max_courses.max(0) as usize);

    recommended
}

/// Recommendation Engine entry point. Never fails: each stage degrades
/// (score 0 / no interests / fallback list) rather than propagating.
pub async fn recommended_courses(db: &Db, answers: &[SubmittedAnswer]) -> Vec<RecommendedCourse> {
    let (score, interests) = match db.questions_by_id().await {
        Ok(questions) => derive_inputs(&questions, answers),
        Err(e) => {
            tracing::warn!("could not load questions for recommendation: {e}");
            (0, Vec::new())
        }
    };

    let level = db.user_level_by_score(score).await;
    let bounds = db.active_recommendation_bounds().await;

    match db.active_courses().await {
        Ok(catalog) if catalog.is_empty() => fallback_courses(&level, &interests, &bounds),
        Ok(catalog) => build_recommendations(&catalog, &level, &interests, &bounds),
        Err(e) => {
            tracing::warn!("course catalog unavailable, falling back: {e}");
            fallback_courses(&level, &interests, &bounds)
        }
    }
}
