//! Database module for SQLite persistence using SeaORM

pub mod entities;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::path::Path;

/// Initialize database connection and create tables
pub async fn init_database(db_path: &Path) -> Result<DatabaseConnection, DbErr> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
    connect(&db_url).await
}

/// Connect to a database URL and create tables.
///
/// In-memory SQLite is pinned to a single pooled connection, since every
/// connection would otherwise see its own empty database.
pub async fn connect(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    tracing::info!("Connecting to database: {}", db_url);

    let mut options = ConnectOptions::new(db_url.to_string());
    options.sqlx_logging(false);
    if db_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    create_tables(&db).await?;
    Ok(db)
}

async fn execute(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(db.get_database_backend(), sql.to_string()))
        .await?;
    Ok(())
}

/// Create all tables if they don't exist
async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Claims table (location holds a GeoJSON geometry once allocated)
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS claims (
            id TEXT PRIMARY KEY,
            claimant_name TEXT NOT NULL,
            village_name TEXT NOT NULL,
            district TEXT NOT NULL,
            state TEXT NOT NULL,
            claim_type TEXT NOT NULL,
            claimed_area REAL,
            location TEXT,
            status TEXT NOT NULL DEFAULT 'PENDING',
            created_by TEXT,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"CREATE INDEX IF NOT EXISTS idx_claims_status ON claims(status)"#,
    )
    .await?;

    // Pattas table (at most one per claim)
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS pattas (
            id TEXT PRIMARY KEY,
            patta_number TEXT NOT NULL UNIQUE,
            issue_date TEXT NOT NULL,
            granted_area REAL NOT NULL,
            claim_id TEXT NOT NULL UNIQUE,
            FOREIGN KEY (claim_id) REFERENCES claims(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    // Socio-economic records. patta_id is a soft reference: a patta may be
    // removed out of band and lookups skip the dangling link.
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS socio_economic (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            claim_id TEXT NOT NULL UNIQUE,
            patta_id TEXT,
            has_pucca_house BOOLEAN NOT NULL DEFAULT 0,
            annual_income REAL NOT NULL,
            is_employed_in_govt BOOLEAN NOT NULL DEFAULT 0,
            has_ration_card BOOLEAN NOT NULL DEFAULT 0,
            is_student BOOLEAN NOT NULL DEFAULT 0,
            last_exam_percentage REAL,
            has_other_scholarship BOOLEAN NOT NULL DEFAULT 0,
            family_size INTEGER,
            age INTEGER,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (claim_id) REFERENCES claims(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"CREATE INDEX IF NOT EXISTS idx_socio_patta ON socio_economic(patta_id)"#,
    )
    .await?;

    // Claim documents table (metadata only, files live in the document store)
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS claim_documents (
            id TEXT PRIMARY KEY,
            claim_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            filename TEXT NOT NULL,
            path TEXT NOT NULL,
            mimetype TEXT NOT NULL,
            size INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (claim_id) REFERENCES claims(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"CREATE INDEX IF NOT EXISTS idx_claim_documents_claim ON claim_documents(claim_id)"#,
    )
    .await?;

    tracing::info!("Database tables initialized");
    Ok(())
}

#[cfg(test)]
pub async fn memory_database() -> DatabaseConnection {
    connect("sqlite::memory:").await.unwrap()
}
