use sqlx::PgPool;

/// Connection pools shared by the Postgres repositories.
///
/// Reads go to `read`, which may point at a replica. Writes always go to the
/// primary through `write`.
#[derive(Clone)]
pub struct PgPools {
    read: PgPool,
    write: PgPool,
}

impl PgPools {
    /// Creates pools from separate primary and read connections.
    #[must_use]
    pub fn new(write: PgPool, read: PgPool) -> Self {
        Self { read, write }
    }

    /// Uses one pool for both reads and writes.
    #[must_use]
    pub fn single(pool: PgPool) -> Self {
        Self {
            read: pool.clone(),
            write: pool,
        }
    }

    /// Pool for queries.
    #[must_use]
    pub fn read(&self) -> &PgPool {
        &self.read
    }

    /// Pool for mutations.
    #[must_use]
    pub fn write(&self) -> &PgPool {
        &self.write
    }
}
