//! Request context — caller identity and cancellation for one request.

use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::watch;

/// Identity and per-request controls threaded through scheduling calls.
///
/// The scheduler elevates internally where fleet data requires it; the
/// caller's own context is what every log line and decision is attributed
/// to.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_id: String,
    pub project_id: String,
    pub is_admin: bool,
    pub request_id: String,
    cancel: Option<watch::Receiver<bool>>,
}

impl RequestContext {
    /// Context for an ordinary project-scoped caller.
    pub fn new(user_id: &str, project_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            project_id: project_id.to_string(),
            is_admin: false,
            request_id: generate_request_id(user_id, project_id),
            cancel: None,
        }
    }

    /// Context for an administrative caller.
    pub fn admin(user_id: &str, project_id: &str) -> Self {
        let mut ctx = Self::new(user_id, project_id);
        ctx.is_admin = true;
        ctx
    }

    /// Attach a cancellation flag.
    ///
    /// The sender side flips the value to `true` to abandon in-flight
    /// scheduling for this request.
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// An administrative copy of this context.
    ///
    /// Caller identity and request ID are preserved; only the privilege
    /// level changes.
    pub fn elevated(&self) -> Self {
        let mut ctx = self.clone();
        ctx.is_admin = true;
        ctx
    }

    /// Whether the caller has asked to abandon this request.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }
}

/// Generate a request ID from caller identity and the current time.
fn generate_request_id(user_id: &str, project_id: &str) -> String {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    user_id.hash(&mut hasher);
    project_id.hash(&mut hasher);
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .hash(&mut hasher);
    format!("req-{:08x}", hasher.finish() as u32)
}
