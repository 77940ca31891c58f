mod bookings;
mod events;
mod health_check;
mod registrations;
mod submission;

pub use bookings::*;
pub use events::*;
pub use health_check::*;
pub use registrations::*;
pub use submission::{
    reject_unreadable_form, FormKind, Notification, NotificationKind, SubmitError,
};
