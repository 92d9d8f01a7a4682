use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_NAME_LENGTH: u64 = 120;
const MIN_SLUG_LENGTH: u64 = 1;
const MAX_SLUG_LENGTH: u64 = 80;
const MAX_ABOUT_LENGTH: u64 = 5000;

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

// ───── Database Models ───────────────────────────────────────────────

/// One directory record per identity; `id` is the owning identity's id.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub slug: String,
    pub graduation_year: i32,
    pub title: String,
    pub employer: String,
    pub location: String,
    pub about: String,
    pub photo_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub website_url: Option<String>,
    pub resume_url: String,
    pub approved: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row written by registration. `approved` and `is_admin` are deliberately
/// absent: the insert forces `approved = false` and never touches `is_admin`.
#[derive(Debug, Clone)]
pub struct ProfileInsert {
    pub id: Uuid,
    pub full_name: String,
    pub slug: String,
    pub graduation_year: i32,
    pub title: String,
    pub employer: String,
    pub location: String,
    pub about: String,
    pub photo_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub website_url: Option<String>,
    pub resume_url: String,
}

// ───── API Response Models ──────────────────────────────────────────

/// Directory card, the subset the listing page renders.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProfileCard {
    pub id: Uuid,
    pub slug: String,
    pub full_name: String,
    pub photo_url: Option<String>,
    pub graduation_year: i32,
    pub title: String,
    pub employer: String,
    pub resume_url: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PendingProfile {
    pub id: Uuid,
    pub slug: String,
    pub full_name: String,
    pub graduation_year: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DirectoryPage {
    pub profiles: Vec<ProfileCard>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub message: String,
}

// ───── Input & Validation Requests ──────────────────────────────────

/// Registration submission. A client-supplied `approved` or `is_admin` is
/// ignored by construction: neither field exists on this type.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegistrationRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH, message = "Full name is required"))]
    pub full_name: String,

    /// Derived from `full_name` when omitted.
    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH),
        custom(function = validate_slug)
    )]
    pub slug: Option<String>,

    pub graduation_year: i32,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub employer: String,

    #[serde(default)]
    pub location: String,

    #[validate(length(min = 1, max = MAX_ABOUT_LENGTH, message = "About is required"))]
    pub about: String,

    #[validate(custom(function = validate_optional_url))]
    pub photo_url: Option<String>,

    #[validate(custom(function = validate_optional_url))]
    pub linkedin_url: Option<String>,

    #[validate(custom(function = validate_optional_url))]
    pub website_url: Option<String>,

    #[validate(length(min = 1, message = "Résumé is required"))]
    pub resume_url: String,
}

impl RegistrationRequest {
    /// Resolve the final slug: the submitted one, or a slugified full name.
    pub fn resolved_slug(&self) -> String {
        match &self.slug {
            Some(slug) if !slug.is_empty() => slug.clone(),
            _ => slug::slugify(&self.full_name),
        }
    }

    pub fn into_insert(self, id: Uuid, slug: String) -> ProfileInsert {
        ProfileInsert {
            id,
            full_name: self.full_name,
            slug,
            graduation_year: self.graduation_year,
            title: self.title,
            employer: self.employer,
            location: self.location,
            about: self.about,
            photo_url: self.photo_url,
            linkedin_url: self.linkedin_url,
            website_url: self.website_url,
            resume_url: self.resume_url,
        }
    }
}

/// Owner edit. Every public field is updatable; approval and admin state are
/// not expressible here.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH, message = "Full name cannot be empty"))]
    pub full_name: Option<String>,

    pub graduation_year: Option<i32>,

    pub title: Option<String>,
    pub employer: Option<String>,
    pub location: Option<String>,

    #[validate(length(min = 1, max = MAX_ABOUT_LENGTH, message = "About cannot be empty"))]
    pub about: Option<String>,

    #[validate(custom(function = validate_optional_url))]
    pub photo_url: Option<String>,

    #[validate(custom(function = validate_optional_url))]
    pub linkedin_url: Option<String>,

    #[validate(custom(function = validate_optional_url))]
    pub website_url: Option<String>,

    #[validate(length(min = 1, message = "Résumé cannot be empty"))]
    pub resume_url: Option<String>,
}

/// Directory query parameters, already clamped by the use case.
#[derive(Debug, Clone, Default)]
pub struct DirectoryFilter {
    pub search: Option<String>,
    pub cohort: Option<i32>,
    pub page: u32,
    pub per_page: u32,
}

// ───── Validators ───────────────────────────────────────────────────

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        let mut error = ValidationError::new("slug_charset");
        error.message = Some("Slug may only contain lowercase letters, digits, and hyphens".into());
        Err(error)
    }
}

pub fn validate_optional_url(value: &str) -> Result<(), ValidationError> {
    url::Url::parse(value).map_err(|_| {
        let mut error = ValidationError::new("invalid_url");
        error.message = Some("Must be a valid URL".into());
        error
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegistrationRequest {
        RegistrationRequest {
            full_name: "Ada Lovelace".into(),
            slug: Some("ada-lovelace".into()),
            graduation_year: 2020,
            title: "Engineer".into(),
            employer: "Analytical Engines".into(),
            location: "London".into(),
            about: "First programmer.".into(),
            photo_url: None,
            linkedin_url: None,
            website_url: None,
            resume_url: "https://cdn.example.com/resumes/ada.pdf".into(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn empty_about_fails() {
        let mut req = request();
        req.about = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn empty_resume_url_fails() {
        let mut req = request();
        req.resume_url = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn slug_with_unsafe_characters_fails() {
        let mut req = request();
        req.slug = Some("Ada Lovelace!".into());
        assert!(req.validate().is_err());
    }

    #[test]
    fn slug_is_derived_from_full_name_when_missing() {
        let mut req = request();
        req.slug = None;
        assert_eq!(req.resolved_slug(), "ada-lovelace");
    }

    #[test]
    fn client_approved_flag_is_not_deserialized() {
        let json = serde_json::json!({
            "full_name": "Ada Lovelace",
            "graduation_year": 2020,
            "about": "First programmer.",
            "resume_url": "https://cdn.example.com/resumes/ada.pdf",
            "approved": true,
            "is_admin": true
        });
        let req: RegistrationRequest = serde_json::from_value(json).unwrap();
        // The flags have nowhere to land; the insert type has no such fields.
        let insert = req.clone().into_insert(Uuid::new_v4(), req.resolved_slug());
        assert_eq!(insert.slug, "ada-lovelace");
    }

    #[test]
    fn bad_linkedin_url_fails() {
        let mut req = request();
        req.linkedin_url = Some("not a url".into());
        assert!(req.validate().is_err());
    }
}
