use color_eyre::Result;

use crate::names;

use super::models::{RecommendationBounds, RecommendationSettingRow, ScoreBandRow};
use super::Db;

const SCORE_COLUMNS: &str = "id, level_name, min_score, max_score, description, is_active, \
                             display_order, created_at, updated_at";
const RECO_COLUMNS: &str = "id, setting_name, min_courses, max_courses, is_active, description, \
                            created_at, updated_at";

impl Db {
    // ----- score bands ------------------------------------------------------

    pub async fn score_bands_ordered(&self) -> Result<Vec<ScoreBandRow>> {
        let bands = sqlx::query_as::<_, ScoreBandRow>(&format!(
            "SELECT {SCORE_COLUMNS} FROM score_settings ORDER BY display_order"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(bands)
    }

    /// Active bands in storage order. When the non-overlap invariant has been
    /// violated, the first band wins, so the order here is load-bearing.
    pub async fn active_score_bands(&self) -> Result<Vec<ScoreBandRow>> {
        let bands = sqlx::query_as::<_, ScoreBandRow>(&format!(
            "SELECT {SCORE_COLUMNS} FROM score_settings WHERE is_active ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(bands)
    }

    pub async fn score_band(&self, band_id: i64) -> Result<Option<ScoreBandRow>> {
        let band = sqlx::query_as::<_, ScoreBandRow>(&format!(
            "SELECT {SCORE_COLUMNS} FROM score_settings WHERE id = $1"
        ))
        .bind(band_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(band)
    }

    /// Level name of an active band whose range intersects `[min, max]`,
    /// excluding `exclude_id` (0 to exclude nothing).
    pub async fn overlapping_band(
        &self,
        min_score: i64,
        max_score: i64,
        exclude_id: i64,
    ) -> Result<Option<String>> {
        let level = sqlx::query_scalar(
            r#"
            SELECT level_name FROM score_settings
            WHERE id != $1 AND is_active AND min_score <= $2 AND max_score >= $3
            LIMIT 1
            "#,
        )
        .bind(exclude_id)
        .bind(max_score)
        .bind(min_score)
        .fetch_optional(&self.pool)
        .await?;

        Ok(level)
    }

    pub async fn create_score_band(
        &self,
        level_name: &str,
        min_score: i64,
        max_score: i64,
        description: Option<&str>,
        is_active: bool,
        display_order: Option<i64>,
    ) -> Result<ScoreBandRow> {
        let max_order: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(display_order), 0) FROM score_settings")
                .fetch_one(&self.pool)
                .await?;

        let band = sqlx::query_as::<_, ScoreBandRow>(&format!(
            r#"
            INSERT INTO score_settings
                (level_name, min_score, max_score, description, is_active, display_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SCORE_COLUMNS}
            "#
        ))
        .bind(level_name)
        .bind(min_score)
        .bind(max_score)
        .bind(description)
        .bind(is_active)
        .bind(display_order.unwrap_or(max_order + 1))
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("score band {} ({level_name:?}) created", band.id);
        Ok(band)
    }

    pub async fn update_score_band(
        &self,
        band_id: i64,
        level_name: &str,
        min_score: i64,
        max_score: i64,
        description: Option<&str>,
        is_active: bool,
        display_order: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE score_settings
            SET level_name = $1, min_score = $2, max_score = $3, description = $4,
                is_active = $5, display_order = $6, updated_at = datetime('now')
            WHERE id = $7
            "#,
        )
        .bind(level_name)
        .bind(min_score)
        .bind(max_score)
        .bind(description)
        .bind(is_active)
        .bind(display_order)
        .bind(band_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_score_band(&self, band_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM score_settings WHERE id = $1")
            .bind(band_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Score Classifier entry point: resolves a score to a level name and
    /// never fails — storage errors degrade to the unclassified sentinel.
    pub async fn user_level_by_score(&self, score: i64) -> String {
        match self.active_score_bands().await {
            Ok(bands) => crate::scoring::classify(&bands, score).to_string(),
            Err(e) => {
                tracing::warn!("could not load score bands, classifying as unclassified: {e}");
                names::UNCLASSIFIED_LEVEL.to_string()
            }
        }
    }

    // ----- recommendation settings -----------------------------------------

    pub async fn recommendation_settings(&self) -> Result<Vec<RecommendationSettingRow>> {
        let settings = sqlx::query_as::<_, RecommendationSettingRow>(&format!(
            "SELECT {RECO_COLUMNS} FROM recommendation_settings"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    pub async fn recommendation_setting(
        &self,
        setting_id: i64,
    ) -> Result<Option<RecommendationSettingRow>> {
        let setting = sqlx::query_as::<_, RecommendationSettingRow>(&format!(
            "SELECT {RECO_COLUMNS} FROM recommendation_settings WHERE id = $1"
        ))
        .bind(setting_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting)
    }

    pub async fn recommendation_setting_name_taken(
        &self,
        setting_name: &str,
        exclude_id: i64,
    ) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM recommendation_settings WHERE setting_name = $1 AND id != $2)",
        )
        .bind(setting_name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    pub async fn create_recommendation_setting(
        &self,
        setting_name: &str,
        min_courses: i64,
        max_courses: i64,
        is_active: bool,
        description: Option<&str>,
    ) -> Result<RecommendationSettingRow> {
        let setting = sqlx::query_as::<_, RecommendationSettingRow>(&format!(
            r#"
            INSERT INTO recommendation_settings
                (setting_name, min_courses, max_courses, is_active, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {RECO_COLUMNS}
            "#
        ))
        .bind(setting_name)
        .bind(min_courses)
        .bind(max_courses)
        .bind(is_active)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("recommendation setting {} ({setting_name:?}) created", setting.id);
        Ok(setting)
    }

    pub async fn update_recommendation_setting(
        &self,
        setting_id: i64,
        setting_name: &str,
        min_courses: i64,
        max_courses: i64,
        is_active: bool,
        description: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE recommendation_settings
            SET setting_name = $1, min_courses = $2, max_courses = $3,
                is_active = $4, description = $5, updated_at = datetime('now')
            WHERE id = $6
            "#,
        )
        .bind(setting_name)
        .bind(min_courses)
        .bind(max_courses)
        .bind(is_active)
        .bind(description)
        .bind(setting_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_recommendation_setting(&self, setting_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM recommendation_settings WHERE id = $1")
            .bind(setting_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deactivates every setting, then activates `setting_id`. Runs in one
    /// transaction per request; concurrent admin requests are not serialized
    /// against each other (accepted gap).
    pub async fn activate_recommendation_setting(
        &self,
        setting_id: i64,
    ) -> Result<Option<RecommendationSettingRow>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE recommendation_settings SET is_active = 0")
            .execute(&mut *tx)
            .await?;

        let setting = sqlx::query_as::<_, RecommendationSettingRow>(&format!(
            r#"
            UPDATE recommendation_settings
            SET is_active = 1, updated_at = datetime('now')
            WHERE id = $1
            RETURNING {RECO_COLUMNS}
            "#
        ))
        .bind(setting_id)
        .fetch_optional(&mut *tx)
        .await?;

        if setting.is_none() {
            // Unknown id: leave the settings untouched.
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(setting)
    }

    /// Bounds the Recommendation Engine should honor. Degrades to the 3–8
    /// defaults when no setting is active or the lookup fails.
    pub async fn active_recommendation_bounds(&self) -> RecommendationBounds {
        let active = sqlx::query_as::<_, RecommendationSettingRow>(&format!(
            "SELECT {RECO_COLUMNS} FROM recommendation_settings WHERE is_active LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await;

        match active {
            Ok(Some(setting)) => RecommendationBounds {
                min_courses: setting.min_courses,
                max_courses: setting.max_courses,
                setting_name: setting.setting_name,
            },
            Ok(None) => RecommendationBounds::default(),
            Err(e) => {
                tracing::warn!("could not load recommendation setting, using defaults: {e}");
                RecommendationBounds::default()
            }
        }
    }
}
