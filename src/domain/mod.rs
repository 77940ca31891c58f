mod attendee_count;
mod availability;
mod booking_reference;
mod email_address;
mod event_offering;
mod form_errors;
pub mod labels;
mod registrant_name;
mod submission;

pub use attendee_count::AttendeeCount;
pub use availability::{is_selectable, AvailabilityPolicy, AvailabilityWindow};
pub use booking_reference::BookingReference;
pub use email_address::EmailAddress;
pub use event_offering::{EventCatalog, EventDate, EventDetails, EventOffering, NOT_SPECIFIED};
pub use form_errors::{FieldError, FormErrors};
pub use registrant_name::RegistrantName;
pub use submission::{BookingRequest, InterestRegistration, Submission};
