use crate::dispatch::{Delivery, DispatchError};
use crate::domain::{BookingReference, FieldError, FormErrors};
use crate::utils::error_chain_fmt;
use actix_web::error::UrlencodedError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};

/// The two forms on the site that post to this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Registration,
    Booking,
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormKind::Registration => write!(f, "registration"),
            FormKind::Booking => write!(f, "booking"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// The toast the page shows once a submit completes.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: &'static str,
    pub message: &'static str,
}

impl FormKind {
    fn success(&self) -> Notification {
        let message = match self {
            FormKind::Registration => {
                "Your registration has been submitted. We'll be in touch soon."
            }
            FormKind::Booking => {
                "Your booking request has been received. We'll contact you shortly to confirm your reservation."
            }
        };
        Notification {
            kind: NotificationKind::Success,
            title: match self {
                FormKind::Registration => "Registration successful!",
                FormKind::Booking => "Registration complete!",
            },
            message,
        }
    }

    fn invalid(&self) -> Notification {
        Notification {
            kind: NotificationKind::Error,
            title: "Please check the form",
            message: "Some fields need your attention before we can submit your request.",
        }
    }

    fn failure(&self) -> Notification {
        match self {
            FormKind::Registration => Notification {
                kind: NotificationKind::Error,
                title: "Something went wrong",
                message: "Please try again later.",
            },
            FormKind::Booking => Notification {
                kind: NotificationKind::Error,
                title: "Error",
                message: "There was a problem submitting your booking request. Please try again.",
            },
        }
    }
}

#[derive(serde::Serialize)]
struct Acknowledgement<'a> {
    notification: Notification,
    booking_reference: &'a BookingReference,
    delivery: &'a Delivery,
}

/// The response to a submission that was dispatched. Nothing of the input is sent back: the
/// page resets the form.
pub fn acknowledge(form: FormKind, reference: &BookingReference, delivery: &Delivery) -> HttpResponse {
    HttpResponse::Ok().json(Acknowledgement {
        notification: form.success(),
        booking_reference: reference,
        delivery,
    })
}

/// Copy of the submitted input, handed back so that the page can re-populate the form.
pub fn retain(form: &impl serde::Serialize) -> serde_json::Value {
    serde_json::to_value(form).unwrap_or_default()
}

#[derive(thiserror::Error)]
pub enum SubmitError {
    #[error("A submission from this form is already being processed")]
    InFlight,
    #[error("No event with id {0} is on offer")]
    UnknownEvent(u32),
    #[error("The {form} submission could not be read")]
    Unreadable {
        form: FormKind,
        #[source]
        source: UrlencodedError,
    },
    #[error("Invalid {form} submission: {errors}")]
    Validation {
        form: FormKind,
        errors: FormErrors,
        retained: serde_json::Value,
    },
    #[error("Failed to dispatch the {form} submission")]
    Dispatch {
        form: FormKind,
        #[source]
        source: DispatchError,
        retained: serde_json::Value,
    },
}

impl std::fmt::Debug for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(serde::Serialize)]
struct ErrorBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    notification: Option<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_errors: Option<&'a [FieldError]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retained: Option<&'a serde_json::Value>,
}

impl ResponseError for SubmitError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubmitError::InFlight => StatusCode::CONFLICT,
            SubmitError::UnknownEvent(_) => StatusCode::NOT_FOUND,
            SubmitError::Unreadable { .. } | SubmitError::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
            SubmitError::Dispatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            // A repeated click is ignored: the first submit produces the only notification.
            SubmitError::InFlight | SubmitError::UnknownEvent(_) => ErrorBody {
                notification: None,
                field_errors: None,
                retained: None,
            },
            SubmitError::Unreadable { form, .. } => ErrorBody {
                notification: Some(form.invalid()),
                field_errors: None,
                retained: None,
            },
            SubmitError::Validation {
                form,
                errors,
                retained,
            } => ErrorBody {
                notification: Some(form.invalid()),
                field_errors: Some(errors.as_slice()),
                retained: Some(retained),
            },
            SubmitError::Dispatch { form, retained, .. } => ErrorBody {
                notification: Some(form.failure()),
                field_errors: None,
                retained: Some(retained),
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Error handler for the form extractor: a body that cannot be decoded still gets a JSON
/// answer carrying a notification.
pub fn reject_unreadable_form(source: UrlencodedError, req: &HttpRequest) -> actix_web::Error {
    let form = if req.path().starts_with("/registrations") {
        FormKind::Registration
    } else {
        FormKind::Booking
    };
    tracing::warn!(error.message = %source, %form, "Rejected an unreadable form submission");
    SubmitError::Unreadable { form, source }.into()
}
