//! Client-side hydration of the initialization state.
//!
//! A server-rendering phase publishes the engine configuration as a snapshot.
//! On the client, the first materialization copies that snapshot into the
//! [`InitState`]. On the server nothing is hydrated: the application calls
//! [`InitState::init`] itself.

use std::sync::{Mutex, PoisonError};

use once_cell::sync::{Lazy, OnceCell};

use crate::error::Result;
use crate::state::{EngineConfig, InitState};

/// Environment variable that marks the process as a server context.
pub const SERVER_ENV_VAR: &str = "VARISTYLE_SERVER";

/// Environment variable holding a JSON hydration snapshot.
pub const SNAPSHOT_ENV_VAR: &str = "VARISTYLE_STATE";

type ServerDetector = fn() -> bool;

static SERVER_DETECTOR: Lazy<Mutex<ServerDetector>> = Lazy::new(|| Mutex::new(env_server_detector));

/// Overrides the detector used to decide whether code runs in a server context.
///
/// This is useful for testing or for hosts that know their execution context.
pub fn set_server_detector(detector: ServerDetector) {
    let mut guard = SERVER_DETECTOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    *guard = detector;
}

/// Returns true when running in a server context.
pub fn is_server_context() -> bool {
    let detector = SERVER_DETECTOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    (*detector)()
}

fn env_server_detector() -> bool {
    std::env::var(SERVER_ENV_VAR)
        .map(|v| matches!(v.trim(), "1" | "true"))
        .unwrap_or(false)
}

/// A place the server-rendered configuration snapshot can be read from.
pub trait SnapshotSource: Send + Sync {
    /// Returns the snapshot, or `None` when none was published.
    fn snapshot(&self) -> Result<Option<EngineConfig>>;
}

static GLOBAL_SNAPSHOT: OnceCell<EngineConfig> = OnceCell::new();

/// Publishes the process-wide snapshot read by [`GlobalSnapshot`].
///
/// Only the first publication is kept; returns `false` for later ones.
pub fn publish_snapshot(config: EngineConfig) -> bool {
    GLOBAL_SNAPSHOT.set(config).is_ok()
}

/// Reads the snapshot published with [`publish_snapshot`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalSnapshot;

impl SnapshotSource for GlobalSnapshot {
    fn snapshot(&self) -> Result<Option<EngineConfig>> {
        Ok(GLOBAL_SNAPSHOT.get().cloned())
    }
}

/// Reads a JSON snapshot from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvSnapshot {
    var: String,
}

impl EnvSnapshot {
    /// Reads from [`SNAPSHOT_ENV_VAR`].
    pub fn new() -> Self {
        Self::from_var(SNAPSHOT_ENV_VAR)
    }

    pub fn from_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSource for EnvSnapshot {
    fn snapshot(&self) -> Result<Option<EngineConfig>> {
        match std::env::var(&self.var) {
            Ok(json) => Ok(Some(EngineConfig::from_json(&json)?)),
            Err(_) => Ok(None),
        }
    }
}

/// A fixed snapshot, mostly useful in tests and embedded hosts.
#[derive(Debug, Clone, Default)]
pub struct StaticSnapshot(pub Option<EngineConfig>);

impl SnapshotSource for StaticSnapshot {
    fn snapshot(&self) -> Result<Option<EngineConfig>> {
        Ok(self.0.clone())
    }
}

/// What a call to [`hydrate`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// The state was already initialized; the snapshot was not read.
    AlreadyInitialized,
    /// Running on the server; the snapshot was not read.
    ServerContext,
    /// No snapshot was available.
    NoSnapshot,
    /// The state was initialized from the snapshot.
    Initialized,
    /// Another caller initialized the state first.
    Lost,
}

/// Initializes `state` from `source` if it is not initialized and not on the server.
///
/// # Errors
///
/// Returns an error when the snapshot exists but cannot be decoded.
pub fn hydrate(
    state: &InitState,
    is_server: bool,
    source: &dyn SnapshotSource,
) -> Result<Hydration> {
    if state.is_initialized() {
        return Ok(Hydration::AlreadyInitialized);
    }
    if is_server {
        return Ok(Hydration::ServerContext);
    }
    let Some(config) = source.snapshot()? else {
        tracing::debug!("no hydration snapshot available");
        return Ok(Hydration::NoSnapshot);
    };
    if state.init(config) {
        tracing::debug!("hydrated styling engine from snapshot");
        Ok(Hydration::Initialized)
    } else {
        Ok(Hydration::Lost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct FailingSource;

    impl SnapshotSource for FailingSource {
        fn snapshot(&self) -> Result<Option<EngineConfig>> {
            panic!("snapshot must not be read");
        }
    }

    #[test]
    fn test_hydrate_initializes_once() {
        let state = InitState::new();
        let source = StaticSnapshot(Some(EngineConfig::default().breakpoint("sm", 0)));

        assert_eq!(hydrate(&state, false, &source).unwrap(), Hydration::Initialized);
        assert!(state.is_initialized());
        assert_eq!(
            hydrate(&state, false, &FailingSource).unwrap(),
            Hydration::AlreadyInitialized
        );
    }

    #[test]
    fn test_hydrate_skips_server_context() {
        let state = InitState::new();
        assert_eq!(
            hydrate(&state, true, &FailingSource).unwrap(),
            Hydration::ServerContext
        );
        assert!(!state.is_initialized());
    }

    #[test]
    fn test_hydrate_without_snapshot_is_not_an_error() {
        let state = InitState::new();
        assert_eq!(
            hydrate(&state, false, &StaticSnapshot(None)).unwrap(),
            Hydration::NoSnapshot
        );
        assert!(!state.is_initialized());
    }

    #[test]
    #[serial]
    fn test_env_snapshot_reads_json() {
        let var = "VARISTYLE_TEST_SNAPSHOT_OK";
        std::env::set_var(var, r#"{"breakpoints": {"md": 768}}"#);
        let config = EnvSnapshot::from_var(var).snapshot().unwrap().unwrap();
        assert_eq!(config.breakpoints["md"], 768);
        std::env::remove_var(var);
    }

    #[test]
    #[serial]
    fn test_env_snapshot_malformed_is_error() {
        let var = "VARISTYLE_TEST_SNAPSHOT_BAD";
        std::env::set_var(var, "{not json");
        let state = InitState::new();
        assert!(hydrate(&state, false, &EnvSnapshot::from_var(var)).is_err());
        assert!(!state.is_initialized());
        std::env::remove_var(var);
    }

    #[test]
    fn test_env_snapshot_missing_var() {
        let source = EnvSnapshot::from_var("VARISTYLE_TEST_SNAPSHOT_UNSET");
        assert!(source.snapshot().unwrap().is_none());
    }

    #[test]
    #[serial]
    fn test_server_detector_override() {
        set_server_detector(|| true);
        assert!(is_server_context());

        set_server_detector(|| false);
        assert!(!is_server_context());
    }
}
