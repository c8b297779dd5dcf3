use sqlx::PgPool;

/// Executes `kanau` processor commands against the connection pool.
///
/// Cloning is cheap: `PgPool` is reference counted.
#[derive(Debug, Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}

impl DatabaseProcessor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
