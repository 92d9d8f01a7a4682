pub mod account;
pub mod article;
pub mod profile;
pub mod sqlx_repo;
pub mod token;

/// OFFSET from a 1-based page number.
pub(crate) fn page_offset(page: u32, per_page: u32) -> i64 {
    let page = page.saturating_sub(1);
    (page as i64) * (per_page as i64)
}
