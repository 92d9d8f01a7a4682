pub mod auth;
pub mod registration;
pub mod lifecycle;
pub mod articles;
pub mod directory;
pub mod extractors;
