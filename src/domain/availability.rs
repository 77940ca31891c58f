use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::cmp::max;

/// Business rules that decide which dates a visitor may pick on the booking form.
#[derive(Debug, Clone)]
pub struct AvailabilityPolicy {
    /// Days either side of the event date that can be requested.
    pub margin_days: u32,
    /// Length of the window offered when the booking is not tied to a known event.
    pub open_horizon_days: u32,
    pub excluded_weekdays: Vec<Weekday>,
}

impl AvailabilityPolicy {
    /// `[max(today, event - margin), event + margin]`. Empty once the event is long gone.
    pub fn window_around(&self, event_date: NaiveDate, today: NaiveDate) -> AvailabilityWindow {
        let margin = Duration::days(i64::from(self.margin_days));
        AvailabilityWindow {
            from: max(
                today,
                event_date.checked_sub_signed(margin).unwrap_or(NaiveDate::MIN),
            ),
            to: event_date.checked_add_signed(margin).unwrap_or(NaiveDate::MAX),
            excluded_weekdays: self.excluded_weekdays.clone(),
        }
    }

    /// `[today, today + open_horizon_days]`.
    pub fn open_window(&self, today: NaiveDate) -> AvailabilityWindow {
        AvailabilityWindow {
            from: today,
            to: today
                .checked_add_signed(Duration::days(i64::from(self.open_horizon_days)))
                .unwrap_or(NaiveDate::MAX),
            excluded_weekdays: self.excluded_weekdays.clone(),
        }
    }
}

/// Inclusive range of selectable dates, minus the excluded weekdays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityWindow {
    from: NaiveDate,
    to: NaiveDate,
    excluded_weekdays: Vec<Weekday>,
}

impl AvailabilityWindow {
    pub fn new(from: NaiveDate, to: NaiveDate, excluded_weekdays: Vec<Weekday>) -> Self {
        Self {
            from,
            to,
            excluded_weekdays,
        }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        is_selectable(date, self)
    }
}

pub fn is_selectable(date: NaiveDate, window: &AvailabilityWindow) -> bool {
    date >= window.from
        && date <= window.to
        && !window.excluded_weekdays.contains(&date.weekday())
}
