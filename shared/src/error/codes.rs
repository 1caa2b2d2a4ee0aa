//! Unified error codes for the booking workspace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Booking / selection errors
//! - 5xxx: Package errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so that the UI layer can
/// map them to localized strings without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Booking ====================
    /// No service selected
    SelectionEmpty = 4001,
    /// Service is not part of the current selection
    ServiceNotFound = 4002,
    /// Selection lost or duplicated items during a recompute
    SelectionInconsistent = 4003,
    /// Step transition not allowed from the current state
    InvalidStepTransition = 4004,
    /// Wizard is waiting for a detour to resolve
    WizardSuspended = 4005,
    /// No detour is currently open
    NoPendingDetour = 4006,

    // ==================== 5xxx: Package ====================
    /// Package mode is not configured
    PackageNotConfigured = 5001,
    /// Target package has no base service
    MissingBaseService = 5002,
    /// Too many add-on services for the package
    MaxServicesExceeded = 5003,
    /// Another package reconciliation is still running
    ReconciliationInProgress = 5004,
    /// Package commit failed after all retries
    PackageCommitFailed = 5005,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// External collaborator failed
    CollaboratorUnavailable = 9002,
}

impl ErrorCode {
    /// Numeric value of the code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether this code represents success
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default (English) message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ValueOutOfRange => "Value out of range",

            ErrorCode::SelectionEmpty => "No service selected",
            ErrorCode::ServiceNotFound => "Service not found in selection",
            ErrorCode::SelectionInconsistent => "Selection is inconsistent",
            ErrorCode::InvalidStepTransition => "Step transition not allowed",
            ErrorCode::WizardSuspended => "Booking is waiting for an open offer",
            ErrorCode::NoPendingDetour => "No offer is open",

            ErrorCode::PackageNotConfigured => "Package discounts are not configured",
            ErrorCode::MissingBaseService => "Package has no base service",
            ErrorCode::MaxServicesExceeded => "Too many services in package",
            ErrorCode::ReconciliationInProgress => "Package update already in progress",
            ErrorCode::PackageCommitFailed => "Failed to apply package",

            ErrorCode::InternalError => "Internal error",
            ErrorCode::CollaboratorUnavailable => "Service temporarily unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when a u16 does not map to a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Booking
            4001 => Ok(ErrorCode::SelectionEmpty),
            4002 => Ok(ErrorCode::ServiceNotFound),
            4003 => Ok(ErrorCode::SelectionInconsistent),
            4004 => Ok(ErrorCode::InvalidStepTransition),
            4005 => Ok(ErrorCode::WizardSuspended),
            4006 => Ok(ErrorCode::NoPendingDetour),

            // Package
            5001 => Ok(ErrorCode::PackageNotConfigured),
            5002 => Ok(ErrorCode::MissingBaseService),
            5003 => Ok(ErrorCode::MaxServicesExceeded),
            5004 => Ok(ErrorCode::ReconciliationInProgress),
            5005 => Ok(ErrorCode::PackageCommitFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::CollaboratorUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::SelectionEmpty.code(), 4001);
        assert_eq!(ErrorCode::MissingBaseService.code(), 5002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::PackageCommitFailed).unwrap();
        assert_eq!(json, "5005");

        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::ServiceNotFound);
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::SelectionEmpty.to_string(), "E4001");
        assert_eq!(ErrorCode::Unknown.to_string(), "E0001");
    }
}
