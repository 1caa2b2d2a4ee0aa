//! Customer Details Model

use serde::{Deserialize, Serialize};

/// Customer contact details entered on the last wizard step
///
/// Field validation belongs to the form; this is a plain value object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub notes: String,
}
