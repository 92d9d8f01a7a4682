use uuid::Uuid;

use verivox::entities::profile::RegistrationRequest;
use verivox::errors::AppError;
use verivox::repositories::profile::MockProfileRepository;
use verivox::use_cases::registration::RegistrationHandler;

const MIN_YEAR: i32 = 2013;

fn request() -> RegistrationRequest {
    serde_json::from_value(serde_json::json!({
        "full_name": "Ada Lovelace",
        "slug": "ada-lovelace",
        "graduation_year": 2020,
        "title": "Engineer",
        "about": "First programmer.",
        "resume_url": "https://cdn.example.com/resumes/ada.pdf"
    }))
    .unwrap()
}

#[tokio::test]
async fn register_upserts_pending_profile() {
    let user_id = Uuid::new_v4();

    let mut repo = MockProfileRepository::new();
    repo.expect_slug_taken()
        .withf(move |slug, exclude| slug == "ada-lovelace" && *exclude == Some(user_id))
        .returning(|_, _| Ok(false));
    repo.expect_upsert_registration()
        .withf(move |insert| insert.id == user_id && insert.slug == "ada-lovelace")
        .times(1)
        .returning(|_| Ok(()));

    let handler = RegistrationHandler::new(repo, MIN_YEAR);

    let response = handler.register(&user_id, request()).await.unwrap();
    assert_eq!(response.message, "Profile saved");
}

#[tokio::test]
async fn slug_is_derived_from_full_name_when_omitted() {
    let user_id = Uuid::new_v4();

    let mut req = request();
    req.slug = None;

    let mut repo = MockProfileRepository::new();
    repo.expect_slug_taken()
        .withf(|slug, _| slug == "ada-lovelace")
        .returning(|_, _| Ok(false));
    repo.expect_upsert_registration()
        .withf(|insert| insert.slug == "ada-lovelace")
        .returning(|_| Ok(()));

    let handler = RegistrationHandler::new(repo, MIN_YEAR);

    assert!(handler.register(&user_id, req).await.is_ok());
}

#[tokio::test]
async fn graduation_year_below_floor_is_rejected() {
    let user_id = Uuid::new_v4();

    let mut req = request();
    req.graduation_year = 2010;

    // No expectations: the repository must not be touched.
    let handler = RegistrationHandler::new(MockProfileRepository::new(), MIN_YEAR);

    let result = handler.register(&user_id, req).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn missing_required_fields_are_rejected() {
    let user_id = Uuid::new_v4();

    let mut req = request();
    req.about = String::new();
    req.resume_url = String::new();

    let handler = RegistrationHandler::new(MockProfileRepository::new(), MIN_YEAR);

    let result = handler.register(&user_id, req).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn taken_slug_is_rejected() {
    let user_id = Uuid::new_v4();

    let mut repo = MockProfileRepository::new();
    repo.expect_slug_taken().returning(|_, _| Ok(true));

    let handler = RegistrationHandler::new(repo, MIN_YEAR);

    let result = handler.register(&user_id, request()).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn unsafe_slug_is_rejected() {
    let user_id = Uuid::new_v4();

    let mut req = request();
    req.slug = Some("Ada Lovelace!".to_string());

    let handler = RegistrationHandler::new(MockProfileRepository::new(), MIN_YEAR);

    let result = handler.register(&user_id, req).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[test]
fn client_cannot_submit_approval_or_admin_state() {
    // Unknown fields are simply dropped; the deserialized request has no
    // way to carry them forward.
    let request: RegistrationRequest = serde_json::from_value(serde_json::json!({
        "full_name": "Mallory",
        "graduation_year": 2020,
        "about": "Hi.",
        "resume_url": "https://cdn.example.com/resumes/m.pdf",
        "approved": true,
        "is_admin": true
    }))
    .unwrap();

    assert_eq!(request.full_name, "Mallory");
}
