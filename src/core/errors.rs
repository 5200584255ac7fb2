//! Shared error types for segregation analysis operations.

use thiserror::Error;

/// Main error type for stratmap operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// A denominator in a statistical formula is zero (empty system,
    /// empty unit, or empty class).
    #[error("degenerate input: {message}")]
    DegenerateInput { message: String },

    /// A class identifier was requested but is absent from the totals table.
    #[error("unknown class: {class}")]
    UnknownClass { class: String },

    /// A unit identifier was referenced but is absent from the required table.
    #[error("unknown areal unit: {unit}")]
    UnknownUnit { unit: String },

    /// A representation entry carries a negative or non-finite ratio or
    /// variance.
    #[error("invalid representation for class {class} in unit {unit}: {message}")]
    InvalidRepresentation {
        unit: String,
        class: String,
        message: String,
    },

    /// A class has more neighbourhoods than overrepresented units.
    #[error(
        "inconsistent counts for class {class}: {neighbourhoods} neighbourhoods from {units} units"
    )]
    InconsistentCount {
        class: String,
        neighbourhoods: usize,
        units: usize,
    },
}

impl Error {
    /// Create a degenerate-input error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateInput {
            message: message.into(),
        }
    }

    /// Create an unknown-class error.
    pub fn unknown_class(class: impl Into<String>) -> Self {
        Self::UnknownClass {
            class: class.into(),
        }
    }

    /// Create an unknown-unit error.
    pub fn unknown_unit(unit: impl Into<String>) -> Self {
        Self::UnknownUnit { unit: unit.into() }
    }

    /// Create an invalid-representation error.
    pub fn invalid_representation(
        unit: impl Into<String>,
        class: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidRepresentation {
            unit: unit.into(),
            class: class.into(),
            message: message.into(),
        }
    }
}

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, Error>;
