//! Session identifier parsing.
//!
//! Identifiers arrive as one comma-separated string. Only the ones carrying
//! [`REMOTE_PREFIX`] are backed by the session generator service.

use std::fmt;

/// Marks an identifier whose credentials live on the session generator.
pub const REMOTE_PREFIX: &str = "DKML~";

/// Storage key prefix for per-session records.
pub const STORAGE_KEY_PREFIX: &str = "creds-";

/// Shared record holding the most recently loaded session.
pub const CURRENT_SLOT_KEY: &str = "creds";

const LABEL_CHARS: usize = 8;

/// Split on commas, trim, and drop empty segments. Order and duplicates are kept.
pub fn parse_session_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Keep only remote-backed identifiers, in their original order.
pub fn remote_sessions(raw: &str) -> Vec<RemoteSessionId> {
    parse_session_list(raw)
        .into_iter()
        .filter_map(RemoteSessionId::parse)
        .collect()
}

/// An identifier with [`REMOTE_PREFIX`] stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteSessionId {
    short_id: String,
}

impl RemoteSessionId {
    pub fn parse(full_id: &str) -> Option<Self> {
        full_id.strip_prefix(REMOTE_PREFIX).map(|short| Self {
            short_id: short.to_string(),
        })
    }

    /// Remote lookup key.
    pub fn short_id(&self) -> &str {
        &self.short_id
    }

    /// Local `sessionId` for this session's own record.
    pub fn storage_key(&self) -> String {
        format!("{STORAGE_KEY_PREFIX}{}", self.short_id)
    }

    /// Truncated form used in log lines, so full ids never reach the output.
    pub fn label(&self) -> String {
        let head: String = self.short_id.chars().take(LABEL_CHARS).collect();
        format!("{head}...")
    }
}

impl fmt::Display for RemoteSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
