//! Explicit loaded/unloaded state for startup-loaded resources.

use std::fmt::Display;

use crate::RiskError;

/// A startup-loaded resource that is either ready or permanently
/// unavailable for the life of the process.
#[derive(Debug)]
pub enum Availability<T> {
    /// Loaded successfully.
    Ready(T),
    /// Failed to load.
    Unavailable {
        /// What the resource is, as shown to callers (e.g. "Accident data").
        resource: &'static str,
        /// Why loading failed. Logged, never sent to callers.
        cause: String,
    },
}

impl<T> Availability<T> {
    /// Wraps a load result, logging the failure once if there is one.
    pub fn from_load<E: Display>(resource: &'static str, result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => {
                log::error!("{resource} failed to load: {e}");
                Self::Unavailable {
                    resource,
                    cause: e.to_string(),
                }
            }
        }
    }

    /// An unavailable resource with the given cause.
    pub fn unavailable(resource: &'static str, cause: impl Into<String>) -> Self {
        Self::Unavailable {
            resource,
            cause: cause.into(),
        }
    }

    /// Returns the resource if it loaded.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Unavailable`] if the resource failed to load.
    pub fn get(&self) -> Result<&T, RiskError> {
        match self {
            Self::Ready(value) => Ok(value),
            Self::Unavailable { resource, .. } => Err(RiskError::Unavailable {
                message: format!("{resource} not loaded on server"),
            }),
        }
    }

    /// Whether the resource loaded.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_load_is_unavailable() {
        let state: Availability<u32> = Availability::from_load("Accident data", Err("missing"));
        assert!(!state.is_ready());
        let err = state.get().unwrap_err();
        assert!(matches!(err, RiskError::Unavailable { .. }));
        assert_eq!(err.to_string(), "Accident data not loaded on server");
    }

    #[test]
    fn ready_returns_value() {
        let state = Availability::from_load::<&str>("Accident data", Ok(7_u32));
        assert!(state.is_ready());
        assert_eq!(*state.get().unwrap(), 7);
    }
}
