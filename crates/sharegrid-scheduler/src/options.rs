//! Runtime-tunable scheduler options.
//!
//! Operators can point the scheduler at a JSON file of tunables that
//! filters and weighers consult through `FilterProperties`. The file is
//! re-read lazily whenever its modification time advances; there is no
//! background watcher task.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;
use tracing::warn;

#[derive(Debug)]
struct OptionsState {
    data: Value,
    last_modified: Option<SystemTime>,
}

/// Lazily reloaded operator options.
pub struct SchedulerOptions {
    path: Option<PathBuf>,
    state: Mutex<OptionsState>,
}

impl SchedulerOptions {
    /// Options backed by an optional JSON file. A `None` path yields an
    /// empty object forever.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            state: Mutex::new(OptionsState {
                data: Value::Object(serde_json::Map::new()),
                last_modified: None,
            }),
        }
    }

    /// Current options snapshot.
    ///
    /// Re-reads the file when its modification time has advanced since
    /// the last successful load. Read or parse failures keep the
    /// previous snapshot.
    pub fn current(&self) -> Value {
        let Some(path) = &self.path else {
            return Value::Object(serde_json::Map::new());
        };

        let mut state = self.state.lock().expect("options lock poisoned");

        let modified = match std::fs::metadata(path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "options file unreadable, keeping previous");
                return state.data.clone();
            }
        };

        let needs_reload = state.last_modified.is_none_or(|prev| modified > prev);
        if needs_reload {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<Value>(&content) {
                    Ok(value) if value.is_object() => {
                        state.data = value;
                        state.last_modified = Some(modified);
                    }
                    Ok(_) => {
                        warn!(path = %path.display(), "options file is not a JSON object, keeping previous");
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "could not decode options file, keeping previous");
                    }
                },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not read options file, keeping previous");
                }
            }
        }

        state.data.clone()
    }
}
