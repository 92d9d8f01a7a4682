pub mod home;
pub mod auth;
pub mod registration;
pub mod admin;
pub mod account;
pub mod articles;
pub mod profiles;
pub mod uploads;
pub mod system;
