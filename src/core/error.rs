//! Error handling and error types for Pure Rust XGBoost.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! is [`XGBoostError`]. Shape violations, degenerate curvature, use before
//! fitting and invalid hyperparameters each have their own variant so callers
//! can react to them without parsing messages.

use std::io;
use thiserror::Error;

/// Main error type for the XGBoost library.
#[derive(Error, Debug)]
pub enum XGBoostError {
    /// Configuration and validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Array shapes that do not line up (rows of X vs y, odd label width, ...)
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Input data that cannot be trained on (empty, non-finite values)
    #[error("Data error: {message}")]
    Data { message: String },

    /// Sum of hessians is zero (or not finite) for a label block
    #[error("Degenerate hessian: {context}")]
    DegenerateHessian { context: String },

    /// Prediction requested from a component that has not completed a fit
    #[error("Not fitted: {component} must be fitted before prediction")]
    NotFitted { component: String },

    /// Training-related errors
    #[error("Training error: {message}")]
    Training { message: String },

    /// Tree construction errors
    #[error("Tree construction error: {message}")]
    TreeConstruction { message: String },

    /// Prediction errors
    #[error("Prediction error: {message}")]
    Prediction { message: String },

    /// Numerical computation errors (overflow, NaN)
    #[error("Numerical error: {message}")]
    Numerical { message: String },

    /// Training stopped through a cancellation token
    #[error("Training cancelled after {completed_rounds} completed rounds")]
    Cancelled { completed_rounds: usize },

    /// Thread pool errors
    #[error("Threading error: {message}")]
    Threading { message: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// TOML parsing errors
    #[error("TOML parse error: {source}")]
    TomlDe {
        #[from]
        source: toml::de::Error,
    },

    /// TOML serialization errors
    #[error("TOML serialization error: {source}")]
    TomlSer {
        #[from]
        source: toml::ser::Error,
    },

    /// Internal library errors (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Type alias for Results using XGBoostError
pub type Result<T> = std::result::Result<T, XGBoostError>;

impl XGBoostError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        XGBoostError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        XGBoostError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        XGBoostError::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a data error
    pub fn data<S: Into<String>>(message: S) -> Self {
        XGBoostError::Data {
            message: message.into(),
        }
    }

    /// Create a degenerate hessian error
    pub fn degenerate_hessian<S: Into<String>>(context: S) -> Self {
        XGBoostError::DegenerateHessian {
            context: context.into(),
        }
    }

    /// Create a not fitted error
    pub fn not_fitted<S: Into<String>>(component: S) -> Self {
        XGBoostError::NotFitted {
            component: component.into(),
        }
    }

    /// Create a training error
    pub fn training<S: Into<String>>(message: S) -> Self {
        XGBoostError::Training {
            message: message.into(),
        }
    }

    /// Create a tree construction error
    pub fn tree_construction<S: Into<String>>(message: S) -> Self {
        XGBoostError::TreeConstruction {
            message: message.into(),
        }
    }

    /// Create a prediction error
    pub fn prediction<S: Into<String>>(message: S) -> Self {
        XGBoostError::Prediction {
            message: message.into(),
        }
    }

    /// Create a numerical error
    pub fn numerical<S: Into<String>>(message: S) -> Self {
        XGBoostError::Numerical {
            message: message.into(),
        }
    }

    /// Create a threading error
    pub fn threading<S: Into<String>>(message: S) -> Self {
        XGBoostError::Threading {
            message: message.into(),
        }
    }

    /// Create an internal error (should be used sparingly)
    pub fn internal<S: Into<String>>(message: S) -> Self {
        XGBoostError::Internal {
            message: message.into(),
        }
    }

    /// Whether the tree builder may skip the offending candidate and keep going.
    ///
    /// Only a degenerate hessian qualifies: the split is rejected and the
    /// search continues. Everything else aborts the fit.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, XGBoostError::DegenerateHessian { .. })
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            XGBoostError::Config { .. } => "config",
            XGBoostError::InvalidParameter { .. } => "invalid_parameter",
            XGBoostError::ShapeMismatch { .. } => "shape_mismatch",
            XGBoostError::Data { .. } => "data",
            XGBoostError::DegenerateHessian { .. } => "degenerate_hessian",
            XGBoostError::NotFitted { .. } => "not_fitted",
            XGBoostError::Training { .. } => "training",
            XGBoostError::TreeConstruction { .. } => "tree_construction",
            XGBoostError::Prediction { .. } => "prediction",
            XGBoostError::Numerical { .. } => "numerical",
            XGBoostError::Cancelled { .. } => "cancelled",
            XGBoostError::Threading { .. } => "threading",
            XGBoostError::Io { .. } => "io",
            XGBoostError::Json { .. } => "json",
            XGBoostError::TomlDe { .. } | XGBoostError::TomlSer { .. } => "toml",
            XGBoostError::Internal { .. } => "internal",
        }
    }
}

/// Convenience macros for error creation
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::XGBoostError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::XGBoostError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! training_error {
    ($msg:expr) => {
        $crate::core::error::XGBoostError::training($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::XGBoostError::training(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}
