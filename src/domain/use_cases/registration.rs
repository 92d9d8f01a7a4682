use uuid::Uuid;
use validator::Validate;

use crate::entities::profile::{validate_slug, RegistrationRequest, RegistrationResponse};
use crate::errors::AppError;
use crate::repositories::profile::ProfileRepository;

/// Registration boundary. All required-field validation happens here, server
/// side, regardless of what the client checked; the stored row is always
/// pending (`approved = false`).
pub struct RegistrationHandler<P>
where
    P: ProfileRepository,
{
    pub profile_repo: P,
    min_graduation_year: i32,
}

impl<P> RegistrationHandler<P>
where
    P: ProfileRepository,
{
    pub fn new(profile_repo: P, min_graduation_year: i32) -> Self {
        RegistrationHandler {
            profile_repo,
            min_graduation_year,
        }
    }

    pub async fn register(
        &self,
        user_id: &Uuid,
        request: RegistrationRequest,
    ) -> Result<RegistrationResponse, AppError> {
        request.validate()?;

        if request.graduation_year < self.min_graduation_year {
            return Err(AppError::validation(
                "graduation_year",
                format!("Graduation year must be {} or later", self.min_graduation_year),
            ));
        }

        let slug = request.resolved_slug();
        validate_slug(&slug)
            .map_err(|_| AppError::validation("slug", "Slug contains unsafe characters"))?;

        if self.profile_repo.slug_taken(&slug, Some(*user_id)).await? {
            return Err(AppError::validation("slug", "Slug is already in use"));
        }

        let insert = request.into_insert(*user_id, slug);
        self.profile_repo.upsert_registration(&insert).await?;

        tracing::info!(user_id = %user_id, "Profile submitted for approval");

        Ok(RegistrationResponse {
            message: "Profile saved".to_string(),
        })
    }
}
