//! Booking wizard steps

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wizard step, in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    Services,
    Datetime,
    Barber,
    Details,
}

impl BookingStep {
    pub const ALL: [BookingStep; 4] = [
        BookingStep::Services,
        BookingStep::Datetime,
        BookingStep::Barber,
        BookingStep::Details,
    ];

    /// Position in the wizard (0-based)
    pub fn index(&self) -> usize {
        match self {
            BookingStep::Services => 0,
            BookingStep::Datetime => 1,
            BookingStep::Barber => 2,
            BookingStep::Details => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_first(&self) -> bool {
        self.prev().is_none()
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStep::Services => "services",
            BookingStep::Datetime => "datetime",
            BookingStep::Barber => "barber",
            BookingStep::Details => "details",
        }
    }
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency() {
        assert_eq!(BookingStep::Services.next(), Some(BookingStep::Datetime));
        assert_eq!(BookingStep::Details.next(), None);
        assert_eq!(BookingStep::Services.prev(), None);
        assert_eq!(BookingStep::Barber.prev(), Some(BookingStep::Datetime));
    }

    #[test]
    fn test_order_matches_index() {
        for pair in BookingStep::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].index() + 1, pair[1].index());
        }
        assert!(BookingStep::Services.is_first());
        assert!(BookingStep::Details.is_terminal());
    }
}
