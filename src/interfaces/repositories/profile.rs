use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;
use sqlx::QueryBuilder;
use std::borrow::Cow;

use crate::{
    entities::profile::{
        DirectoryFilter, PendingProfile, Profile, ProfileCard, ProfileInsert,
        UpdateProfileRequest,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxProfileRepo,
};

use super::page_offset;

/// Row counts from a teardown's transactional delete step.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeardownRows {
    pub articles_deleted: u64,
    pub profile_deleted: bool,
}

#[automock]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Registration upsert keyed on the identity id. Always writes
    /// `approved = false`; never touches `is_admin`.
    async fn upsert_registration(&self, profile: &ProfileInsert) -> Result<(), AppError>;
    async fn get_profile(&self, id: &Uuid) -> Result<Option<Profile>, AppError>;
    async fn get_profile_by_slug(&self, slug: &str) -> Result<Option<Profile>, AppError>;
    async fn slug_taken(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError>;
    /// Returns the number of rows affected; approving an approved profile
    /// still affects one row, so idempotence falls out of plain UPDATE.
    async fn approve_profile(&self, id: &Uuid) -> Result<u64, AppError>;
    async fn update_profile(
        &self,
        id: &Uuid,
        update: &UpdateProfileRequest,
    ) -> Result<Profile, AppError>;
    async fn list_approved(
        &self,
        filter: &DirectoryFilter,
    ) -> Result<(Vec<ProfileCard>, i64), AppError>;
    async fn list_cohorts(&self) -> Result<Vec<i32>, AppError>;
    async fn list_pending(&self) -> Result<Vec<PendingProfile>, AppError>;
    /// Deletes the member's articles and profile row in one transaction,
    /// articles first.
    async fn delete_profile_with_articles(&self, id: &Uuid) -> Result<TeardownRows, AppError>;
}

impl SqlxProfileRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxProfileRepo { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepo {
    async fn upsert_registration(&self, profile: &ProfileInsert) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (
                id, full_name, slug, graduation_year, title, employer, location,
                about, photo_url, linkedin_url, website_url, resume_url, approved
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, FALSE)
            ON CONFLICT (id) DO UPDATE SET
                full_name = EXCLUDED.full_name,
                slug = EXCLUDED.slug,
                graduation_year = EXCLUDED.graduation_year,
                title = EXCLUDED.title,
                employer = EXCLUDED.employer,
                location = EXCLUDED.location,
                about = EXCLUDED.about,
                photo_url = EXCLUDED.photo_url,
                linkedin_url = EXCLUDED.linkedin_url,
                website_url = EXCLUDED.website_url,
                resume_url = EXCLUDED.resume_url,
                approved = FALSE,
                updated_at = NOW()
            "#,
        )
        .bind(profile.id)
        .bind(&profile.full_name)
        .bind(&profile.slug)
        .bind(profile.graduation_year)
        .bind(&profile.title)
        .bind(&profile.employer)
        .bind(&profile.location)
        .bind(&profile.about)
        .bind(&profile.photo_url)
        .bind(&profile.linkedin_url)
        .bind(&profile.website_url)
        .bind(&profile.resume_url)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            match e {
                sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
                    AppError::Conflict("Slug already in use".to_string())
                }
                _ => AppError::from(e),
            }
        })?;

        Ok(())
    }

    async fn get_profile(&self, id: &Uuid) -> Result<Option<Profile>, AppError> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_profile_by_slug(&self, slug: &str) -> Result<Option<Profile>, AppError> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn slug_taken(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let taken: bool = match exclude_id {
            Some(id) => {
                sqlx::query_scalar(
                    "SELECT EXISTS(SELECT 1 FROM profiles WHERE slug = $1 AND id <> $2)",
                )
                .bind(slug)
                .bind(id)
                .fetch_one(&self.pool)
                .await
            }
            None => {
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM profiles WHERE slug = $1)")
                    .bind(slug)
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(AppError::from)?;

        Ok(taken)
    }

    async fn approve_profile(&self, id: &Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE profiles SET approved = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(result.rows_affected())
    }

    async fn update_profile(
        &self,
        id: &Uuid,
        update: &UpdateProfileRequest,
    ) -> Result<Profile, AppError> {
        // COALESCE preserves existing fields when Option::None is provided
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles SET
                full_name = COALESCE($1, full_name),
                graduation_year = COALESCE($2, graduation_year),
                title = COALESCE($3, title),
                employer = COALESCE($4, employer),
                location = COALESCE($5, location),
                about = COALESCE($6, about),
                photo_url = COALESCE($7, photo_url),
                linkedin_url = COALESCE($8, linkedin_url),
                website_url = COALESCE($9, website_url),
                resume_url = COALESCE($10, resume_url),
                updated_at = NOW()
            WHERE id = $11
            RETURNING *
            "#,
        )
        .bind(&update.full_name)
        .bind(update.graduation_year)
        .bind(&update.title)
        .bind(&update.employer)
        .bind(&update.location)
        .bind(&update.about)
        .bind(&update.photo_url)
        .bind(&update.linkedin_url)
        .bind(&update.website_url)
        .bind(&update.resume_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

        Ok(profile)
    }

    async fn list_approved(
        &self,
        filter: &DirectoryFilter,
    ) -> Result<(Vec<ProfileCard>, i64), AppError> {
        let mut query = QueryBuilder::new(
            "SELECT id, slug, full_name, photo_url, graduation_year, title, employer, resume_url \
             FROM profiles WHERE approved = TRUE",
        );
        push_directory_filters(&mut query, filter);
        query.push(" ORDER BY full_name ASC LIMIT ");
        query.push_bind(filter.per_page as i64);
        query.push(" OFFSET ");
        query.push_bind(page_offset(filter.page, filter.per_page));

        let cards = query
            .build_query_as::<ProfileCard>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;

        let mut count_query =
            QueryBuilder::new("SELECT COUNT(*) FROM profiles WHERE approved = TRUE");
        push_directory_filters(&mut count_query, filter);

        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok((cards, total))
    }

    async fn list_cohorts(&self) -> Result<Vec<i32>, AppError> {
        sqlx::query_scalar(
            "SELECT DISTINCT graduation_year FROM profiles WHERE approved = TRUE \
             ORDER BY graduation_year DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_pending(&self) -> Result<Vec<PendingProfile>, AppError> {
        sqlx::query_as::<_, PendingProfile>(
            "SELECT id, slug, full_name, graduation_year, created_at \
             FROM profiles WHERE approved = FALSE ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn delete_profile_with_articles(&self, id: &Uuid) -> Result<TeardownRows, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        let articles_deleted = sqlx::query("DELETE FROM articles WHERE author_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?
            .rows_affected();

        let profile_deleted = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?
            .rows_affected()
            > 0;

        tx.commit().await.map_err(AppError::from)?;

        Ok(TeardownRows {
            articles_deleted,
            profile_deleted,
        })
    }
}

fn push_directory_filters(query: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &DirectoryFilter) {
    if let Some(cohort) = filter.cohort {
        query.push(" AND graduation_year = ");
        query.push_bind(cohort);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        query.push(" AND (full_name ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR title ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR about ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }
}
