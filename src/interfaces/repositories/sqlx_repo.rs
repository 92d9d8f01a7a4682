use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxAccountRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxProfileRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxArticleRepo {
    pub pool: PgPool,
}
