//! Developer access to the audit panel.
//!
//! Access is a single shared key. A successful login yields a [`DevSession`]
//! token that callers pass explicitly to audit operations; nothing is stored
//! process-wide.

use crate::error::{CoberturaError, Result};
use subtle::ConstantTimeEq;

/// Proof that the caller presented the developer key.
///
/// Only [`DevAccess::login`] can construct one.
#[derive(Debug, Clone)]
pub struct DevSession {
    _private: (),
}

/// Gate holding the configured developer key
#[derive(Clone)]
pub struct DevAccess {
    key: Option<String>,
}

impl DevAccess {
    pub fn new(key: Option<String>) -> Self {
        Self {
            key: key.filter(|k| !k.is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    /// Compare an attempt against the configured key
    pub fn login(&self, attempt: &str) -> Result<DevSession> {
        let key = self.key.as_ref().ok_or(CoberturaError::DevAccessDisabled)?;

        if bool::from(key.as_bytes().ct_eq(attempt.as_bytes())) {
            tracing::debug!("Developer session opened");
            Ok(DevSession { _private: () })
        } else {
            tracing::warn!("Rejected developer key attempt");
            Err(CoberturaError::Unauthorized)
        }
    }
}

impl std::fmt::Debug for DevAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevAccess")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_accepts_matching_key() {
        let access = DevAccess::new(Some("clave".to_string()));
        assert!(access.login("clave").is_ok());
    }

    #[test]
    fn test_login_rejects_wrong_key() {
        let access = DevAccess::new(Some("clave".to_string()));
        assert!(matches!(access.login("clav"), Err(CoberturaError::Unauthorized)));
        assert!(matches!(access.login(""), Err(CoberturaError::Unauthorized)));
    }

    #[test]
    fn test_login_without_key_is_disabled() {
        let access = DevAccess::new(Some(String::new()));
        assert!(!access.is_enabled());
        assert!(matches!(access.login(""), Err(CoberturaError::DevAccessDisabled)));
    }

    #[test]
    fn test_debug_hides_key() {
        let access = DevAccess::new(Some("clave".to_string()));
        assert!(!format!("{:?}", access).contains("clave"));
    }
}
