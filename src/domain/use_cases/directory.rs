use uuid::Uuid;
use validator::Validate;

use crate::entities::profile::{DirectoryFilter, DirectoryPage, Profile, UpdateProfileRequest};
use crate::errors::AppError;
use crate::repositories::profile::ProfileRepository;

const PAGE_SIZE: u32 = 12;
const MAX_PAGE_SIZE: u32 = 50;

/// Public directory of approved members, plus owner profile maintenance.
pub struct DirectoryHandler<P>
where
    P: ProfileRepository,
{
    pub profile_repo: P,
}

impl<P> DirectoryHandler<P>
where
    P: ProfileRepository,
{
    pub fn new(profile_repo: P) -> Self {
        DirectoryHandler { profile_repo }
    }

    pub async fn list(&self, mut filter: DirectoryFilter) -> Result<DirectoryPage, AppError> {
        filter.page = filter.page.max(1);
        filter.per_page = match filter.per_page {
            0 => PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        };
        filter.search = filter
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let (profiles, total) = self.profile_repo.list_approved(&filter).await?;

        Ok(DirectoryPage {
            profiles,
            total,
            page: filter.page,
            per_page: filter.per_page,
        })
    }

    pub async fn cohorts(&self) -> Result<Vec<i32>, AppError> {
        self.profile_repo.list_cohorts().await
    }

    /// Slug lookup for the public profile page; unapproved profiles are
    /// invisible here.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Profile, AppError> {
        let profile = self
            .profile_repo
            .get_profile_by_slug(slug)
            .await?
            .filter(|p| p.approved)
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

        Ok(profile)
    }

    /// The caller's own profile, approved or not (for the edit form).
    pub async fn own_profile(&self, caller_id: &Uuid) -> Result<Profile, AppError> {
        self.profile_repo
            .get_profile(caller_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }

    /// Owner edit. The update type cannot express `approved` or `is_admin`.
    pub async fn update_own_profile(
        &self,
        caller_id: &Uuid,
        request: UpdateProfileRequest,
    ) -> Result<Profile, AppError> {
        request.validate()?;
        self.profile_repo.update_profile(caller_id, &request).await
    }
}
