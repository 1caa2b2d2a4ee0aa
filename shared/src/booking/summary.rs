//! Booking summary handed to the submission collaborator

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{CustomerDetails, SelectedService};

/// Aggregate amounts of a selection
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BookingTotals {
    /// Sum of undiscounted prices
    pub subtotal: f64,
    /// Sum of charged prices
    pub total: f64,
    /// subtotal - total
    pub savings: f64,
    /// Minutes
    pub total_duration: u32,
    /// Add-ons currently discounted by the package
    pub add_on_count: usize,
    /// Tier percentage applied to the add-ons
    pub discount_percentage: u32,
}

/// Everything the wizard collected, ready for submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingSummary {
    /// Client-side draft id, used to correlate submission logs
    pub draft_id: Uuid,
    pub services: Vec<SelectedService>,
    pub totals: BookingTotals,
    pub date: NaiveDate,
    pub staff_id: String,
    pub time_slot: NaiveTime,
    pub customer: CustomerDetails,
}
