//! Lighting error types
//!
//! Nothing in the lighting core performs I/O, so every error is either a
//! configuration mistake or a broken setup invariant. Errors raised while a
//! tick paints objects are never propagated out of the tick; the session logs
//! them and keeps them for [`LightingSession::take_diagnostics`].
//!
//! [`LightingSession::take_diagnostics`]: crate::lighting::LightingSession::take_diagnostics

use thiserror::Error;

use crate::config::{ConfigError, TimeIndex};

/// Scene or object configuration mistakes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A variant switch was requested before any scene configuration was installed
    #[error("no scene configuration has been set up")]
    NoConfiguration,

    /// No configured variant matches the requested time index
    #[error("no lighting variant configured for time index {0}")]
    UnknownVariant(TimeIndex),

    /// Object relies on baked mesh targets but has none
    #[error("lit object '{0}' has no mesh targets; it should have been baked")]
    NotBaked(String),

    /// Objects that look for meshes at runtime cannot be baked ahead of time
    #[error("lit object '{0}' checks for dynamic meshes and cannot be baked")]
    CannotBakeDynamic(String),

    /// Scene tunables are unusable
    #[error("invalid scene configuration: {0}")]
    InvalidScene(String),
}

/// Errors reported by the lighting core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LightingError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A colour buffer no longer matches the mesh it was sized for
    #[error("mesh '{mesh}' has {vertex_count} vertices but its colour buffer holds {buffer_len}; the object was not set up for this mesh")]
    Consistency {
        /// Mesh name
        mesh: String,
        /// Length of the cached colour buffer
        buffer_len: usize,
        /// Live vertex count of the mesh
        vertex_count: usize,
    },

    /// Mesh lock was poisoned by a panicking writer
    #[error("mesh '{mesh}' is unavailable")]
    MeshUnavailable {
        /// Mesh name
        mesh: String,
    },

    /// The session has been released
    #[error("lighting session has been released")]
    Released,

    /// Key does not name a light in this session
    #[error("unknown vertex light")]
    UnknownLight,

    /// Key does not name a lit object in this session
    #[error("unknown lit object")]
    UnknownLitObject,
}

impl From<ConfigError> for LightingError {
    fn from(error: ConfigError) -> Self {
        Self::Configuration(ConfigurationError::InvalidScene(error.to_string()))
    }
}

/// Lighting result type
pub type LightingResult<T> = Result<T, LightingError>;
