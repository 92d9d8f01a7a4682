use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod graceful_shutdown;

pub use domain::{entities, password, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{auth, db, storage};

use auth::jwt::JwtService;
use repositories::sqlx_repo::{SqlxAccountRepo, SqlxArticleRepo, SqlxProfileRepo};
use storage::{ObjectStorage, StorageBuckets};
use use_cases::articles::ArticleHandler;
use use_cases::auth::AuthHandler;
use use_cases::directory::DirectoryHandler;
use use_cases::lifecycle::LifecycleHandler;
use use_cases::registration::RegistrationHandler;

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub registration_handler: AppRegistrationHandler,
    pub lifecycle_handler: AppLifecycleHandler,
    pub article_handler: AppArticleHandler,
    pub directory_handler: AppDirectoryHandler,
    pub storage: Arc<dyn ObjectStorage>,
    pub buckets: StorageBuckets,
}

pub type AppAuthHandler = AuthHandler<SqlxAccountRepo, JwtService>;
pub type AppRegistrationHandler = RegistrationHandler<SqlxProfileRepo>;
pub type AppLifecycleHandler = LifecycleHandler<SqlxProfileRepo, SqlxAccountRepo>;
pub type AppArticleHandler = ArticleHandler<SqlxArticleRepo, SqlxProfileRepo>;
pub type AppDirectoryHandler = DirectoryHandler<SqlxProfileRepo>;

impl AppState {
    pub fn new(
        config: &settings::AppConfig,
        pool: sqlx::PgPool,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        let jwt_service = JwtService::new(config);
        let account_repo = SqlxAccountRepo { pool: pool.clone() };
        let profile_repo = SqlxProfileRepo { pool: pool.clone() };
        let article_repo = SqlxArticleRepo { pool };

        let buckets = StorageBuckets {
            photos: config.photos_bucket.clone(),
            resumes: config.resumes_bucket.clone(),
        };

        let auth_handler = AuthHandler::new(account_repo.clone(), jwt_service);
        let registration_handler =
            RegistrationHandler::new(profile_repo.clone(), config.min_graduation_year);
        let lifecycle_handler = LifecycleHandler::new(
            profile_repo.clone(),
            account_repo,
            Arc::clone(&storage),
            buckets.clone(),
        );
        let article_handler = ArticleHandler::new(article_repo, profile_repo.clone());
        let directory_handler = DirectoryHandler::new(profile_repo);

        AppState {
            auth_handler,
            registration_handler,
            lifecycle_handler,
            article_handler,
            directory_handler,
            storage,
            buckets,
        }
    }
}
