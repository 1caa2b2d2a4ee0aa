//! Step Validation Gate
//!
//! Preconditions for leaving each step forward. Validation failures never
//! become errors: the gate answers `false` and shows a notice.

use chrono::{NaiveDate, NaiveTime};
use shared::booking::BookingStep;
use shared::message::{Notice, NoticeKey};
use shared::models::SelectedService;

use super::collaborators::Notifier;

/// Inputs the gate looks at
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub selection: &'a [SelectedService],
    pub date: Option<NaiveDate>,
    pub staff_id: Option<&'a str>,
    pub time_slot: Option<NaiveTime>,
    /// Reported by the customer-details form
    pub details_valid: bool,
}

/// Pure check: which notice blocks `step`, if any
pub fn check_step(step: BookingStep, ctx: &StepContext<'_>) -> Option<NoticeKey> {
    match step {
        BookingStep::Services if ctx.selection.is_empty() => {
            Some(NoticeKey::SelectAtLeastOneService)
        }
        BookingStep::Datetime if ctx.date.is_none() => Some(NoticeKey::SelectDate),
        BookingStep::Barber if ctx.staff_id.is_none_or(str::is_empty) => {
            Some(NoticeKey::SelectBarber)
        }
        BookingStep::Barber if ctx.time_slot.is_none() => Some(NoticeKey::SelectTimeSlot),
        BookingStep::Details if !ctx.details_valid => Some(NoticeKey::CompleteCustomerDetails),
        _ => None,
    }
}

pub struct StepValidationGate<'a> {
    notifier: &'a dyn Notifier,
}

impl<'a> StepValidationGate<'a> {
    pub fn new(notifier: &'a dyn Notifier) -> Self {
        Self { notifier }
    }

    /// Validate `step`, notifying on failure; returns the blocking notice
    pub fn validate(&self, step: BookingStep, ctx: &StepContext<'_>) -> Option<NoticeKey> {
        let blocked = check_step(step, ctx);
        if let Some(key) = blocked {
            tracing::debug!(step = %step, notice = %key, "Step validation failed");
            self.notifier.notify(Notice::error(key));
        }
        blocked
    }

    pub fn can_advance(&self, step: BookingStep, ctx: &StepContext<'_>) -> bool {
        self.validate(step, ctx).is_none()
    }

    /// Validate every step up to and including `step`, stopping at the first failure
    pub fn validate_through(&self, step: BookingStep, ctx: &StepContext<'_>) -> Option<NoticeKey> {
        BookingStep::ALL
            .iter()
            .take(step.index() + 1)
            .find_map(|s| check_step(*s, ctx))
            .inspect(|key| self.notifier.notify(Notice::error(*key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<NoticeKey>>);

    impl Notifier for Recorder {
        fn notify(&self, notice: Notice) {
            self.0.lock().push(notice.key);
        }
    }

    fn service() -> SelectedService {
        SelectedService {
            id: "cut".into(),
            name_en: "Cut".into(),
            name_ar: String::new(),
            base_price: 80.0,
            duration: 30,
            price: 80.0,
            original_price: None,
            discount_percentage: None,
            is_base_package_service: false,
            is_package_add_on: false,
            is_upsell_item: false,
        }
    }

    fn empty_ctx(selection: &[SelectedService]) -> StepContext<'_> {
        StepContext {
            selection,
            date: None,
            staff_id: None,
            time_slot: None,
            details_valid: false,
        }
    }

    #[test]
    fn test_services_requires_selection() {
        let recorder = Recorder::default();
        let gate = StepValidationGate::new(&recorder);

        assert!(!gate.can_advance(BookingStep::Services, &empty_ctx(&[])));
        assert_eq!(*recorder.0.lock(), vec![NoticeKey::SelectAtLeastOneService]);

        let selection = vec![service()];
        assert!(gate.can_advance(BookingStep::Services, &empty_ctx(&selection)));
        assert_eq!(recorder.0.lock().len(), 1);
    }

    #[test]
    fn test_each_failure_has_distinct_notice() {
        let ctx = empty_ctx(&[]);
        assert_eq!(check_step(BookingStep::Datetime, &ctx), Some(NoticeKey::SelectDate));
        assert_eq!(check_step(BookingStep::Barber, &ctx), Some(NoticeKey::SelectBarber));
        assert_eq!(
            check_step(BookingStep::Details, &ctx),
            Some(NoticeKey::CompleteCustomerDetails)
        );

        let with_staff = StepContext {
            staff_id: Some("amir"),
            ..ctx
        };
        assert_eq!(
            check_step(BookingStep::Barber, &with_staff),
            Some(NoticeKey::SelectTimeSlot)
        );
    }

    #[test]
    fn test_empty_staff_id_counts_as_missing() {
        let ctx = StepContext {
            staff_id: Some(""),
            time_slot: NaiveTime::from_hms_opt(10, 0, 0),
            ..empty_ctx(&[])
        };
        assert_eq!(check_step(BookingStep::Barber, &ctx), Some(NoticeKey::SelectBarber));
    }

    #[test]
    fn test_validate_through_reports_first_failure() {
        let recorder = Recorder::default();
        let gate = StepValidationGate::new(&recorder);
        let selection = vec![service()];
        let ctx = StepContext {
            date: NaiveDate::from_ymd_opt(2026, 3, 1),
            details_valid: true,
            ..empty_ctx(&selection)
        };

        assert_eq!(
            gate.validate_through(BookingStep::Details, &ctx),
            Some(NoticeKey::SelectBarber)
        );
        assert_eq!(*recorder.0.lock(), vec![NoticeKey::SelectBarber]);
    }
}
