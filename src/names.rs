// Route paths and semantic constants shared across handlers and services.

pub const QUESTIONS_URL: &str = "/api/questions";
pub const SUBMIT_URL: &str = "/api/submit";

pub const ADMIN_LOGIN_URL: &str = "/api/admin/login";
pub const ADMIN_LOGOUT_URL: &str = "/api/admin/logout";
pub const ADMIN_PROFILE_URL: &str = "/api/admin/profile";

pub const ADMIN_QUESTIONS_URL: &str = "/api/admin/questions";
pub const ADMIN_QUESTIONS_REORDER_URL: &str = "/api/admin/questions/reorder";
pub const ADMIN_COURSES_URL: &str = "/api/admin/courses";
pub const ADMIN_SCORE_SETTINGS_URL: &str = "/api/admin/score-settings";
pub const ADMIN_RECOMMENDATION_SETTINGS_URL: &str = "/api/admin/recommendation-settings";

pub const ADMIN_STATS_URL: &str = "/api/admin/stats";
pub const ADMIN_REAL_TIME_STATS_URL: &str = "/api/admin/real_time_stats";
pub const ADMIN_DETAILED_STATS_URL: &str = "/api/admin/detailed_stats";
pub const ADMIN_CLEAR_DATA_URL: &str = "/api/admin/clear_data";
pub const ADMIN_EXPORT_EXCEL_URL: &str = "/api/admin/export/excel";
pub const ADMIN_EXPORT_POWERPOINT_URL: &str = "/api/admin/export/powerpoint";

pub const ADMIN_SESSION_COOKIE_NAME: &str = "admin_session";

/// Admin account name used by the `--admin-password` bootstrap.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

// Recommendation bounds used when no setting row is active.
pub const DEFAULT_MIN_COURSES: i64 = 3;
pub const DEFAULT_MAX_COURSES: i64 = 8;
pub const DEFAULT_SETTING_NAME: &str = "default";

/// Hard limit on a recommendation setting's course counts.
pub const COURSE_COUNT_LIMIT: i64 = 100;

/// Per-interest matching stops once the whole recommendation list reaches
/// this size. See recommend.rs for the exact counting rule.
pub const INTEREST_CAP: usize = 4;

/// Level returned when no active band covers a score.
pub const UNCLASSIFIED_LEVEL: &str = "未分類";

pub const BEGINNER_LEVEL: &str = "攝影新手";

/// Courses force-recommended to beginners, matched by substring in title,
/// in this order.
pub const BEGINNER_REQUIRED_TITLES: &[&str] = &[
    "EOS R系列相機全面操作班",
    "基本自動對焦 - 理論班",
    "掌握拍攝設定-拍出準確色彩不求人",
    "鏡頭配搭實用指南",
];

/// Display color per level; unknown levels fall back to grey.
pub fn level_color(level: &str) -> &'static str {
    match level {
        "攝影新手" => "#4CAF50",
        "進階攝影師" => "#FF9800",
        "高階攝影師" => "#F44336",
        // 向後兼容
        "中階攝影師" => "#FF9800",
        _ => "#6c757d",
    }
}
