use shared::error::{AppError, ErrorCode};
use shared::message::NoticeKey;
use thiserror::Error;

/// Booking engine errors
#[derive(Debug, Clone, Error)]
pub enum BookingError {
    #[error("Service not found in selection: {0}")]
    ServiceNotFound(String),

    #[error("Selection size changed during recompute: expected {expected}, got {actual}")]
    SelectionInconsistent { expected: usize, actual: usize },

    #[error("Duplicate service id in selection: {0}")]
    DuplicateService(String),

    #[error("Package settings are not configured")]
    PackageNotConfigured,

    #[error("Target package has no base service")]
    MissingBaseService,

    #[error("Package has {count} add-ons, maximum is {max}")]
    MaxServicesExceeded { count: usize, max: u32 },

    #[error("Another package reconciliation is in progress")]
    ReconciliationInProgress,

    #[error("Package commit failed: {0}")]
    CommitFailed(String),

    #[error("Step transition not allowed: {0}")]
    InvalidTransition(String),

    #[error("Wizard is suspended on a detour")]
    Suspended,

    #[error("No detour is open")]
    NoPendingDetour,

    #[error("Collaborator failed: {0}")]
    Collaborator(String),
}

impl BookingError {
    /// Error code for the UI layer
    pub fn code(&self) -> ErrorCode {
        match self {
            BookingError::ServiceNotFound(_) => ErrorCode::ServiceNotFound,
            BookingError::SelectionInconsistent { .. } | BookingError::DuplicateService(_) => {
                ErrorCode::SelectionInconsistent
            }
            BookingError::PackageNotConfigured => ErrorCode::PackageNotConfigured,
            BookingError::MissingBaseService => ErrorCode::MissingBaseService,
            BookingError::MaxServicesExceeded { .. } => ErrorCode::MaxServicesExceeded,
            BookingError::ReconciliationInProgress => ErrorCode::ReconciliationInProgress,
            BookingError::CommitFailed(_) => ErrorCode::PackageCommitFailed,
            BookingError::InvalidTransition(_) => ErrorCode::InvalidStepTransition,
            BookingError::Suspended => ErrorCode::WizardSuspended,
            BookingError::NoPendingDetour => ErrorCode::NoPendingDetour,
            BookingError::Collaborator(_) => ErrorCode::CollaboratorUnavailable,
        }
    }

    /// Which localized notice the user sees for this error
    pub fn notice_key(&self) -> NoticeKey {
        NoticeKey::for_error(self.code())
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let code = err.code();
        let app = AppError::with_message(code, err.to_string());
        match err {
            BookingError::ServiceNotFound(id) | BookingError::DuplicateService(id) => {
                app.with_detail("service_id", id)
            }
            BookingError::SelectionInconsistent { expected, actual } => app
                .with_detail("expected", expected)
                .with_detail("actual", actual),
            BookingError::MaxServicesExceeded { count, max } => {
                app.with_detail("count", count).with_detail("max", max)
            }
            _ => app,
        }
    }
}

impl From<AppError> for BookingError {
    fn from(err: AppError) -> Self {
        BookingError::Collaborator(err.message)
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
