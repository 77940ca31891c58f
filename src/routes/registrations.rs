use crate::configuration::BookingSettings;
use crate::dispatch::Transport;
use crate::domain::{
    BookingReference, EmailAddress, FormErrors, InterestRegistration, RegistrantName,
    Submission,
};
use crate::routes::submission::{acknowledge, retain, FormKind, SubmitError};
use crate::submission_guard::SubmissionGuard;
use actix_web::{web, HttpResponse};
use std::borrow::Cow;
use std::convert::TryFrom;
use validator::{Validate, ValidationError};

/// The "register your interest" form. Every field defaults to empty so that a missing field is
/// reported next to the field instead of failing the whole request.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize, Validate)]
pub struct RegistrationFormData {
    #[serde(default)]
    #[validate(custom = "validate_name")]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom = "validate_location")]
    pub location: String,
    #[serde(default)]
    #[validate(custom = "validate_event_type")]
    pub event_type: String,
    #[serde(default)]
    pub form_token: Option<String>,
}

impl RegistrationFormData {
    fn guard_key(&self) -> &str {
        self.form_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

fn required(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    error
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    RegistrantName::parse(name.to_string())
        .map(|_| ())
        .map_err(|_| required("name", "Name is required"))
}

/// Location and event type come from `<select>`s: any non-blank code is accepted.
fn validate_location(code: &str) -> Result<(), ValidationError> {
    if code.trim().is_empty() {
        return Err(required("location", "Please select a location"));
    }
    Ok(())
}

fn validate_event_type(code: &str) -> Result<(), ValidationError> {
    if code.trim().is_empty() {
        return Err(required("event_type", "Please select an event type"));
    }
    Ok(())
}

impl TryFrom<RegistrationFormData> for InterestRegistration {
    type Error = FormErrors;

    fn try_from(form: RegistrationFormData) -> Result<Self, Self::Error> {
        form.validate()?;
        let name = RegistrantName::parse(form.name)
            .map_err(|_| FormErrors::single("name", "Name is required"))?;
        let email = EmailAddress::parse(form.email)
            .map_err(|_| FormErrors::single("email", "Valid email is required"))?;
        Ok(Self {
            name,
            email,
            location_code: form.location.trim().to_string(),
            event_type_code: form.event_type.trim().to_string(),
        })
    }
}

#[tracing::instrument(
    name = "Registering interest",
    skip(form, transport, settings, guard),
    fields(
        registrant_email = %form.email,
        registrant_name = %form.name
    )
)]
pub async fn register_interest(
    form: web::Form<RegistrationFormData>,
    transport: web::Data<Transport>,
    settings: web::Data<BookingSettings>,
    guard: web::Data<SubmissionGuard>,
) -> Result<HttpResponse, SubmitError> {
    let form = form.0;
    let _in_flight = guard
        .acquire(FormKind::Registration, form.guard_key())
        .ok_or(SubmitError::InFlight)?;

    let retained = retain(&form);
    let registration =
        InterestRegistration::try_from(form).map_err(|errors| SubmitError::Validation {
            form: FormKind::Registration,
            errors,
            retained: retained.clone(),
        })?;

    let reference = BookingReference::generate(&settings.reference_prefix);
    let today = chrono::Utc::now().date_naive();
    let delivery = transport
        .dispatch(&Submission::Interest(registration), &reference, today)
        .await
        .map_err(|source| {
            tracing::error!("Failed to dispatch registration {}: {:?}", reference, source);
            SubmitError::Dispatch {
                form: FormKind::Registration,
                source,
                retained,
            }
        })?;

    Ok(acknowledge(FormKind::Registration, &reference, &delivery))
}
