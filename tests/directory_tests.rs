mod common;

use uuid::Uuid;

use common::sample_profile;
use verivox::entities::profile::DirectoryFilter;
use verivox::errors::AppError;
use verivox::repositories::profile::MockProfileRepository;
use verivox::use_cases::directory::DirectoryHandler;

#[tokio::test]
async fn listing_defaults_to_twelve_per_page() {
    let mut repo = MockProfileRepository::new();
    repo.expect_list_approved()
        .withf(|filter| filter.page == 1 && filter.per_page == 12)
        .returning(|_| Ok((vec![], 0)));

    let handler = DirectoryHandler::new(repo);

    let page = handler.list(DirectoryFilter::default()).await.unwrap();
    assert_eq!(page.per_page, 12);
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn blank_search_is_dropped() {
    let mut repo = MockProfileRepository::new();
    repo.expect_list_approved()
        .withf(|filter| filter.search.is_none())
        .returning(|_| Ok((vec![], 0)));

    let handler = DirectoryHandler::new(repo);

    let filter = DirectoryFilter {
        search: Some("   ".to_string()),
        ..Default::default()
    };

    assert!(handler.list(filter).await.is_ok());
}

#[tokio::test]
async fn unapproved_profile_is_invisible_by_slug() {
    let mut repo = MockProfileRepository::new();
    repo.expect_get_profile_by_slug()
        .returning(|_| Ok(Some(sample_profile(Uuid::new_v4(), false, false))));

    let handler = DirectoryHandler::new(repo);

    let result = handler.get_by_slug("ada-lovelace").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn own_profile_is_visible_before_approval() {
    let caller = Uuid::new_v4();

    let mut repo = MockProfileRepository::new();
    repo.expect_get_profile()
        .returning(|id| Ok(Some(sample_profile(*id, false, false))));

    let handler = DirectoryHandler::new(repo);

    let profile = handler.own_profile(&caller).await.unwrap();
    assert!(!profile.approved);
}
