//! SQL DDL for the session table shared with the host application.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `sessionId` TEXT PRIMARY KEY (`creds-<shortId>` or the `creds` slot)
/// - `sessionData` TEXT NULL, the JSON-serialized credential payload
/// - no timestamp columns
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS "WhatsappSessions" (
    "sessionId" TEXT NOT NULL PRIMARY KEY,
    "sessionData" TEXT NULL
);
"#;
