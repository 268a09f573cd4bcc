//! # Schema Migrations
//!
//! Applies the embedded schema with a PostgreSQL advisory lock so parallel
//! test binaries pointed at the same database do not race the DDL. Statements
//! are idempotent (`IF NOT EXISTS`), so re-running is safe.

use sqlx::PgPool;

/// Advisory lock key guarding schema application. Arbitrary but stable.
const MIGRATION_LOCK_KEY: i64 = 7_302_664_011_042_886;

const SCHEMA_SQL: &str = include_str!("../../migrations/20260801000000_create_intake_submissions.sql");

/// Manages database schema application.
pub struct DatabaseMigrations;

impl DatabaseMigrations {
    /// Apply the schema, serialized across processes via an advisory lock.
    pub async fn run_all(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(pool)
            .await?;

        let result = sqlx::raw_sql(SCHEMA_SQL).execute(pool).await;

        // Release the lock even when the DDL failed.
        sqlx::query("SELECT pg_advisory_unlock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(pool)
            .await?;

        result?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_schema_targets_submissions_table() {
        assert!(SCHEMA_SQL.contains("intake_submissions"));
        // Re-runnable: every statement must be guarded.
        for statement in SCHEMA_SQL.split(';').filter(|s| s.contains("CREATE")) {
            assert!(
                statement.contains("IF NOT EXISTS"),
                "non-idempotent statement: {statement}"
            );
        }
    }
}
