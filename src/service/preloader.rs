use crate::config::{Config, SessionSettings};
use crate::db::{SessionStorage, SessionStore};
use crate::error::PreloadError;
use crate::session_api::{SessionApiClient, SessionFetcher};
use crate::session_id::{CURRENT_SLOT_KEY, RemoteSessionId, remote_sessions};
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// What happened to one remote session during a preload pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A record with data already existed; nothing was fetched.
    AlreadyLoaded,
    /// Downloaded and written to both the session record and the current slot.
    Saved,
    /// The server answered without usable `data`.
    NotFoundOnServer,
    /// The server answered 404.
    Expired,
    /// Network, timeout, decode or storage failure.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub session: RemoteSessionId,
    pub outcome: SessionOutcome,
}

/// Remote sessions to load and where to load them from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadPlan {
    base_url: String,
    sessions: Vec<RemoteSessionId>,
}

impl PreloadPlan {
    /// `Ok(None)` when no remote session is listed.
    /// `Err(MissingSessionUrl)` when some are listed but the base URL is empty.
    pub fn resolve(settings: &SessionSettings) -> Result<Option<Self>, PreloadError> {
        let sessions = remote_sessions(&settings.sessions);
        if sessions.is_empty() {
            return Ok(None);
        }
        let base_url = settings.session_url.trim();
        if base_url.is_empty() {
            return Err(PreloadError::MissingSessionUrl);
        }
        Ok(Some(Self {
            base_url: base_url.to_string(),
            sessions,
        }))
    }

    pub fn sessions(&self) -> &[RemoteSessionId] {
        &self.sessions
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Prepare the store, then load every session in list order.
    ///
    /// Only a schema failure aborts the pass; per-session failures are
    /// reported in the returned list.
    pub async fn run<S, F>(&self, store: &S, fetcher: &F) -> Result<Vec<SessionReport>, PreloadError>
    where
        S: SessionStore + ?Sized,
        F: SessionFetcher + ?Sized,
    {
        store.ensure_schema().await?;

        let mut reports = Vec::with_capacity(self.sessions.len());
        for session in &self.sessions {
            let outcome = self.load_one(session, store, fetcher).await;
            reports.push(SessionReport {
                session: session.clone(),
                outcome,
            });
        }
        log_summary(&reports);
        Ok(reports)
    }

    async fn load_one<S, F>(
        &self,
        session: &RemoteSessionId,
        store: &S,
        fetcher: &F,
    ) -> SessionOutcome
    where
        S: SessionStore + ?Sized,
        F: SessionFetcher + ?Sized,
    {
        let key = session.storage_key();
        match store.find(&key).await {
            Ok(Some(existing)) if existing.is_loaded() => {
                info!(session = %session, "session already loaded");
                return SessionOutcome::AlreadyLoaded;
            }
            Ok(_) => {}
            Err(e) => {
                error!(session = %session, error = %e, "session lookup failed");
                return SessionOutcome::Failed(e.to_string());
            }
        }

        info!(session = %session, "downloading session");
        let payload = match fetcher.fetch(&self.base_url, session.short_id()).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                error!(session = %session, "session not found on server");
                return SessionOutcome::NotFoundOnServer;
            }
            Err(e) if e.is_not_found() => {
                error!(
                    session = %session,
                    "session not found or expired, generate a new one"
                );
                return SessionOutcome::Expired;
            }
            Err(e) => {
                error!(session = %session, error = %e, "session download failed");
                return SessionOutcome::Failed(e.to_string());
            }
        };

        if let Err(e) = save(store, &key, &payload).await {
            error!(session = %session, error = %e, "session download failed");
            return SessionOutcome::Failed(e.to_string());
        }
        info!(session = %session, "session downloaded and saved to database");
        SessionOutcome::Saved
    }
}

/// Write the payload under the session's own key, then into the current slot.
async fn save<S>(store: &S, key: &str, payload: &Value) -> Result<(), PreloadError>
where
    S: SessionStore + ?Sized,
{
    store.upsert(key, payload).await?;
    store.upsert(CURRENT_SLOT_KEY, payload).await?;
    debug!(key, slot = CURRENT_SLOT_KEY, "session records upserted");
    Ok(())
}

fn log_summary(reports: &[SessionReport]) {
    let loaded = reports
        .iter()
        .filter(|r| r.outcome == SessionOutcome::Saved)
        .count();
    let skipped = reports
        .iter()
        .filter(|r| r.outcome == SessionOutcome::AlreadyLoaded)
        .count();
    let failed = reports.len() - loaded - skipped;
    info!(loaded, skipped, failed, "session preload finished");
}

/// Run a preload pass against caller-provided storage and fetcher.
///
/// Returns an empty list when nothing is remote-backed, and
/// `MissingSessionUrl` or a storage error when the pass is aborted.
pub async fn preload_with<S, F>(
    settings: &SessionSettings,
    store: &S,
    fetcher: &F,
) -> Result<Vec<SessionReport>, PreloadError>
where
    S: SessionStore + ?Sized,
    F: SessionFetcher + ?Sized,
{
    match PreloadPlan::resolve(settings)? {
        Some(plan) => plan.run(store, fetcher).await,
        None => Ok(Vec::new()),
    }
}

/// Preload remote sessions described by `cfg` into the SQLite database at
/// `cfg.database_url`. Never fails; every problem is logged.
pub async fn preload(cfg: &Config) {
    let settings = cfg.session_settings();
    let plan = match PreloadPlan::resolve(&settings) {
        Ok(Some(plan)) => plan,
        Ok(None) => return,
        Err(e) => {
            warn!(
                error = %e,
                "set SESSION_URL to the session generator URL to load remote sessions"
            );
            return;
        }
    };

    let store = match SessionStorage::connect_lazy(&cfg.database_url) {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "session loader: DB error");
            return;
        }
    };
    let client = match SessionApiClient::new(cfg.proxy.as_ref()) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "session loader: failed to build HTTP client");
            return;
        }
    };

    if let Err(e) = plan.run(&store, &client).await {
        error!(error = %e, "session loader: DB error");
    }
}
