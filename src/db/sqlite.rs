use crate::db::models::{SessionRecord, decode_session_data, encode_session_data};
use crate::db::schema::SQLITE_INIT;
use crate::error::PreloadError;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Persistence used by the preloader.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Make sure the session table exists. Safe to call repeatedly.
    async fn ensure_schema(&self) -> Result<(), PreloadError>;

    async fn find(&self, session_id: &str) -> Result<Option<SessionRecord>, PreloadError>;

    /// Insert or fully replace the record stored under `session_id`.
    async fn upsert(&self, session_id: &str, data: &Value) -> Result<(), PreloadError>;
}

#[derive(Clone)]
pub struct SessionStorage {
    pool: SqlitePool,
}

impl SessionStorage {
    /// Wrap a pool owned by the host application.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Build a pool from a database URL without connecting yet.
    /// The first query opens the connection (creating the file if missing).
    pub fn connect_lazy(database_url: &str) -> Result<Self, PreloadError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_lazy_with(connect_opts);
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn row_to_model(row: SqliteRow) -> Result<SessionRecord, PreloadError> {
        let session_id: String = row.try_get("sessionId")?;
        let raw: Option<String> = row.try_get("sessionData")?;
        Ok(SessionRecord {
            session_id,
            session_data: decode_session_data(raw.as_deref()),
        })
    }
}

#[async_trait]
impl SessionStore for SessionStorage {
    async fn ensure_schema(&self) -> Result<(), PreloadError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn find(&self, session_id: &str) -> Result<Option<SessionRecord>, PreloadError> {
        let row = sqlx::query(
            r#"SELECT "sessionId", "sessionData" FROM "WhatsappSessions" WHERE "sessionId" = ?"#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    async fn upsert(&self, session_id: &str, data: &Value) -> Result<(), PreloadError> {
        let encoded = encode_session_data(Some(data))?;
        sqlx::query(
            r#"
            INSERT INTO "WhatsappSessions" ("sessionId", "sessionData")
            VALUES (?, ?)
            ON CONFLICT("sessionId") DO UPDATE SET
                "sessionData" = excluded."sessionData"
            "#,
        )
        .bind(session_id)
        .bind(encoded)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_database_url(tag: &str) -> (String, std::path::PathBuf) {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "session-preload-{tag}-{}-{nanos}.sqlite",
            std::process::id()
        ));
        (format!("sqlite:{}", path.display()), path)
    }

    #[tokio::test]
    async fn upsert_replaces_and_find_decodes() {
        let (url, path) = temp_database_url("sqlite-upsert");
        let storage = SessionStorage::connect_lazy(&url).unwrap();
        storage.ensure_schema().await.unwrap();
        storage.ensure_schema().await.unwrap();

        assert_eq!(storage.find("creds-a").await.unwrap(), None);

        storage.upsert("creds-a", &json!({"v": 1})).await.unwrap();
        storage.upsert("creds-a", &json!({"v": 2})).await.unwrap();

        let rec = storage.find("creds-a").await.unwrap().unwrap();
        assert_eq!(rec.session_id, "creds-a");
        assert_eq!(rec.session_data, Some(json!({"v": 2})));
        assert!(rec.is_loaded());

        storage.pool().close().await;
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn corrupt_or_null_data_reads_as_not_loaded() {
        let (url, path) = temp_database_url("sqlite-corrupt");
        let storage = SessionStorage::connect_lazy(&url).unwrap();
        storage.ensure_schema().await.unwrap();

        sqlx::query(r#"INSERT INTO "WhatsappSessions" ("sessionId", "sessionData") VALUES (?, ?)"#)
            .bind("creds-bad")
            .bind("{oops")
            .execute(storage.pool())
            .await
            .unwrap();
        sqlx::query(r#"INSERT INTO "WhatsappSessions" ("sessionId", "sessionData") VALUES (?, NULL)"#)
            .bind("creds-null")
            .execute(storage.pool())
            .await
            .unwrap();

        let bad = storage.find("creds-bad").await.unwrap().unwrap();
        assert!(!bad.is_loaded());
        let null = storage.find("creds-null").await.unwrap().unwrap();
        assert!(!null.is_loaded());

        storage.pool().close().await;
        let _ = std::fs::remove_file(&path);
    }
}
