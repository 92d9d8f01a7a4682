pub mod user;
pub mod profile;
pub mod article;
pub mod token;
