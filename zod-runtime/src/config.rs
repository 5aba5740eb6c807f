//! Error mappers and process-wide configuration.
//!
//! An [`ErrorMapper`] turns a raw issue into a message, or declines with
//! `None` so the next mapper in the chain is consulted. Mappers can be
//! attached to a check, a schema, a [`ParseContext`](crate::ParseContext), or
//! installed globally through [`config`].
//!
//! # Example
//! ```rust
//! use zod_runtime::config::{CodeMessages, ZodConfig};
//! use zod_runtime::IssueCode;
//!
//! let config = ZodConfig::new()
//!     .with_locale_error(CodeMessages::new().message(IssueCode::InvalidType, "Wrong type"));
//! assert!(config.locale_error.is_some());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use tracing::debug;

use crate::error::{IssueCode, RawIssue};

/// Resolves a message for a raw issue.
///
/// Returning `None` defers to the next mapper in the chain.
pub trait ErrorMapper: Send + Sync {
    /// Map an issue to a message.
    fn map(&self, issue: &RawIssue) -> Option<String>;
}

impl<F> ErrorMapper for F
where
    F: Fn(&RawIssue) -> Option<String> + Send + Sync,
{
    fn map(&self, issue: &RawIssue) -> Option<String> {
        self(issue)
    }
}

/// Shared mapper handle.
pub type ErrorMap = Arc<dyn ErrorMapper>;

/// Wrap a closure as an [`ErrorMap`].
pub fn error_map<F>(mapper: F) -> ErrorMap
where
    F: Fn(&RawIssue) -> Option<String> + Send + Sync + 'static,
{
    Arc::new(mapper)
}

/// Mapper that always answers with the same message.
pub fn message_map(message: impl Into<String>) -> ErrorMap {
    Arc::new(FixedMessage(message.into()))
}

struct FixedMessage(String);

impl ErrorMapper for FixedMessage {
    fn map(&self, _issue: &RawIssue) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Mapper keyed by issue code. Codes without an entry are deferred.
#[derive(Debug, Clone, Default)]
pub struct CodeMessages {
    messages: HashMap<IssueCode, String>,
}

impl CodeMessages {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message for a code.
    pub fn message(mut self, code: IssueCode, message: impl Into<String>) -> Self {
        self.messages.insert(code, message.into());
        self
    }
}

impl ErrorMapper for CodeMessages {
    fn map(&self, issue: &RawIssue) -> Option<String> {
        self.messages.get(&issue.code()).cloned()
    }
}

/// Tries several mappers in order; the first answer wins.
#[derive(Clone, Default)]
pub struct ChainedMapper {
    mappers: Vec<ErrorMap>,
}

impl ChainedMapper {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mapper to the chain.
    pub fn with_mapper<M: ErrorMapper + 'static>(mut self, mapper: M) -> Self {
        self.mappers.push(Arc::new(mapper));
        self
    }
}

impl ErrorMapper for ChainedMapper {
    fn map(&self, issue: &RawIssue) -> Option<String> {
        self.mappers.iter().find_map(|mapper| mapper.map(issue))
    }
}

/// Process-wide message configuration.
///
/// `custom_error` is consulted before `locale_error`; both come after the
/// issue's own mapper and the parse context.
#[derive(Clone, Default)]
pub struct ZodConfig {
    /// Application-level overrides.
    pub custom_error: Option<ErrorMap>,
    /// Locale bundle; falls back to the built-in English messages.
    pub locale_error: Option<ErrorMap>,
}

impl fmt::Debug for ZodConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZodConfig")
            .field("custom_error", &self.custom_error.is_some())
            .field("locale_error", &self.locale_error.is_some())
            .finish()
    }
}

impl ZodConfig {
    /// Empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the custom mapper.
    pub fn with_custom_error<M: ErrorMapper + 'static>(mut self, mapper: M) -> Self {
        self.custom_error = Some(Arc::new(mapper));
        self
    }

    /// Set the locale mapper.
    pub fn with_locale_error<M: ErrorMapper + 'static>(mut self, mapper: M) -> Self {
        self.locale_error = Some(Arc::new(mapper));
        self
    }
}

static GLOBAL_CONFIG: LazyLock<RwLock<ZodConfig>> =
    LazyLock::new(|| RwLock::new(ZodConfig::default()));

/// Merge `update` into the global configuration.
///
/// Only the mappers present in `update` are replaced.
pub fn config(update: ZodConfig) {
    let mut current = GLOBAL_CONFIG.write().unwrap_or_else(PoisonError::into_inner);
    if update.custom_error.is_some() {
        current.custom_error = update.custom_error;
    }
    if update.locale_error.is_some() {
        current.locale_error = update.locale_error;
    }
    debug!(
        custom_error = current.custom_error.is_some(),
        locale_error = current.locale_error.is_some(),
        "Installed global config"
    );
}

/// Replace the global configuration wholesale.
pub fn replace_config(next: ZodConfig) {
    *GLOBAL_CONFIG.write().unwrap_or_else(PoisonError::into_inner) = next;
    debug!("Replaced global config");
}

/// Restore the built-in defaults.
pub fn reset_config() {
    replace_config(ZodConfig::default());
}

/// Snapshot of the global configuration.
///
/// The lock is released before the snapshot is returned, so mappers never run
/// while it is held.
pub fn global_config() -> ZodConfig {
    GLOBAL_CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
