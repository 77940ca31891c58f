use crate::domain::{AttendeeCount, EmailAddress, EventDetails, RegistrantName};
use chrono::NaiveDate;

/// A validated "register your interest" submission.
#[derive(Debug, Clone)]
pub struct InterestRegistration {
    pub name: RegistrantName,
    pub email: EmailAddress,
    pub location_code: String,
    pub event_type_code: String,
}

/// A validated booking request for one event.
///
/// Only built once every field has passed validation, so holding one means it can be
/// dispatched as is.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub name: RegistrantName,
    pub email: EmailAddress,
    pub phone: String,
    pub company: Option<String>,
    pub attendee_count: AttendeeCount,
    pub preferred_date: NaiveDate,
    pub dietary_requirements: Option<String>,
    pub questions: Option<String>,
    pub marketing_consent: bool,
    pub event: EventDetails,
}

#[derive(Debug, Clone)]
pub enum Submission {
    Interest(InterestRegistration),
    Booking(BookingRequest),
}

impl Submission {
    pub fn name(&self) -> &RegistrantName {
        match self {
            Submission::Interest(r) => &r.name,
            Submission::Booking(b) => &b.name,
        }
    }

    pub fn email(&self) -> &EmailAddress {
        match self {
            Submission::Interest(r) => &r.email,
            Submission::Booking(b) => &b.email,
        }
    }

    /// Bookings are also forwarded to the support team; plain interest is not.
    pub fn needs_support_notice(&self) -> bool {
        matches!(self, Submission::Booking(_))
    }
}
