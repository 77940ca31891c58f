use crate::configuration::BookingSettings;
use crate::dispatch::Transport;
use crate::domain::{
    AttendeeCount, AvailabilityPolicy, BookingReference, BookingRequest, EmailAddress,
    EventCatalog, EventDetails, FormErrors, RegistrantName, Submission,
};
use crate::routes::submission::{acknowledge, retain, FormKind, SubmitError};
use crate::submission_guard::SubmissionGuard;
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Dates arrive from an HTML date input.
const SELECTED_DATE_FORMAT: &str = "%Y-%m-%d";

const FULL_NAME_REQUIRED: &str = "Full name is required";
const INVALID_EMAIL: &str = "Invalid email address";
const PHONE_REQUIRED: &str = "Phone number is required";
const MIN_PHONE_LENGTH: usize = 5;
const ATTENDEES_REQUIRED: &str = "Number of attendees is required";
const DATE_REQUIRED: &str = "Please select a date";
const DATE_UNAVAILABLE: &str = "The selected date is not available";

#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize, Validate)]
pub struct BookingFormData {
    #[serde(default)]
    #[validate(custom = "validate_full_name")]
    pub full_name: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom = "validate_phone")]
    pub phone: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    #[validate(custom = "validate_attendee_count")]
    pub attendee_count: String,
    #[serde(default)]
    #[validate(custom = "validate_selected_date")]
    pub selected_date: String,
    #[serde(default)]
    pub dietary_requirements: Option<String>,
    #[serde(default)]
    pub questions: Option<String>,
    /// Posted by a checkbox: absent when unticked, `on` (or any other value) when ticked.
    #[serde(default)]
    pub marketing_consent: Option<String>,
    /// Only read by the multi-event form.
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub form_token: Option<String>,
}

impl BookingFormData {
    fn guard_key(&self) -> &str {
        self.form_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .unwrap_or(&self.email)
    }

    fn marketing_consent(&self) -> bool {
        match self.marketing_consent.as_deref().map(str::trim) {
            None | Some("") => false,
            Some(value) => !["false", "0", "off", "no"]
                .iter()
                .any(|refused| value.eq_ignore_ascii_case(refused)),
        }
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    error
}

fn validate_full_name(full_name: &str) -> Result<(), ValidationError> {
    RegistrantName::parse(full_name.to_string())
        .map(|_| ())
        .map_err(|_| field_error("full_name", FULL_NAME_REQUIRED))
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().chars().count() < MIN_PHONE_LENGTH {
        return Err(field_error("phone", PHONE_REQUIRED));
    }
    Ok(())
}

fn validate_attendee_count(count: &str) -> Result<(), ValidationError> {
    AttendeeCount::parse(count)
        .map(|_| ())
        .map_err(|_| field_error("attendee_count", ATTENDEES_REQUIRED))
}

fn validate_selected_date(date: &str) -> Result<(), ValidationError> {
    parse_selected_date(date)
        .map(|_| ())
        .map_err(|_| field_error("selected_date", DATE_REQUIRED))
}

fn parse_selected_date(date: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date.trim(), SELECTED_DATE_FORMAT)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validates a booking form against the schema, then checks the preferred date against the
/// availability window of the chosen event.
pub fn parse_booking(
    form: BookingFormData,
    event: EventDetails,
    policy: &AvailabilityPolicy,
    today: NaiveDate,
) -> Result<BookingRequest, FormErrors> {
    form.validate()?;

    let marketing_consent = form.marketing_consent();
    let name = RegistrantName::parse(form.full_name)
        .map_err(|_| FormErrors::single("full_name", FULL_NAME_REQUIRED))?;
    let email = EmailAddress::parse(form.email)
        .map_err(|_| FormErrors::single("email", INVALID_EMAIL))?;
    let attendee_count = AttendeeCount::parse(&form.attendee_count)
        .map_err(|_| FormErrors::single("attendee_count", ATTENDEES_REQUIRED))?;
    let preferred_date = parse_selected_date(&form.selected_date)
        .map_err(|_| FormErrors::single("selected_date", DATE_REQUIRED))?;

    let window = match event.scheduled_on {
        Some(event_date) => policy.window_around(event_date, today),
        None => policy.open_window(today),
    };
    if !window.is_selectable(preferred_date) {
        return Err(FormErrors::single("selected_date", DATE_UNAVAILABLE));
    }

    Ok(BookingRequest {
        name,
        email,
        phone: form.phone.trim().to_string(),
        company: non_empty(form.company),
        attendee_count,
        preferred_date,
        dietary_requirements: non_empty(form.dietary_requirements),
        questions: non_empty(form.questions),
        marketing_consent,
        event,
    })
}

/// Multi-event booking: the event is picked on the form. An id that matches no offered event
/// is still booked, with every event detail "Not specified".
#[tracing::instrument(
    name = "Booking an event",
    skip(form, catalog, settings, transport, guard),
    fields(
        registrant_email = %form.email,
        event_id = ?form.event_id
    )
)]
pub async fn book_event(
    form: web::Form<BookingFormData>,
    catalog: web::Data<EventCatalog>,
    settings: web::Data<BookingSettings>,
    transport: web::Data<Transport>,
    guard: web::Data<SubmissionGuard>,
) -> Result<HttpResponse, SubmitError> {
    let form = form.0;
    let event = catalog.resolve(form.event_id.as_deref());
    submit_booking(form, event, &settings, &transport, &guard).await
}

/// Single-event booking: the event is fixed by the page the dialog was opened from.
#[tracing::instrument(
    name = "Booking a listed event",
    skip(form, catalog, settings, transport, guard),
    fields(registrant_email = %form.email)
)]
pub async fn book_listed_event(
    event_id: web::Path<u32>,
    form: web::Form<BookingFormData>,
    catalog: web::Data<EventCatalog>,
    settings: web::Data<BookingSettings>,
    transport: web::Data<Transport>,
    guard: web::Data<SubmissionGuard>,
) -> Result<HttpResponse, SubmitError> {
    let event_id = event_id.into_inner();
    let event = catalog
        .get(event_id)
        .map(EventDetails::from)
        .ok_or(SubmitError::UnknownEvent(event_id))?;
    submit_booking(form.0, event, &settings, &transport, &guard).await
}

async fn submit_booking(
    form: BookingFormData,
    event: EventDetails,
    settings: &BookingSettings,
    transport: &Transport,
    guard: &SubmissionGuard,
) -> Result<HttpResponse, SubmitError> {
    let _in_flight = guard
        .acquire(FormKind::Booking, form.guard_key())
        .ok_or(SubmitError::InFlight)?;

    let today = chrono::Utc::now().date_naive();
    let retained = retain(&form);
    let booking = parse_booking(form, event, &settings.availability_policy(), today).map_err(
        |errors| SubmitError::Validation {
            form: FormKind::Booking,
            errors,
            retained: retained.clone(),
        },
    )?;

    let reference = BookingReference::generate(&settings.reference_prefix);
    let delivery = transport
        .dispatch(&Submission::Booking(booking), &reference, today)
        .await
        .map_err(|source| {
            tracing::error!("Failed to dispatch booking {}: {:?}", reference, source);
            SubmitError::Dispatch {
                form: FormKind::Booking,
                source,
                retained,
            }
        })?;

    Ok(acknowledge(FormKind::Booking, &reference, &delivery))
}
