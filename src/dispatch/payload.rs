use crate::configuration::CorrespondenceSettings;
use crate::domain::labels::{event_type_label, location_label};
use crate::domain::{BookingReference, Submission};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use tera::{Context, Tera};

const CONFIRMATION_TEMPLATE: &str = "confirmation_email.html";
const SUPPORT_TEMPLATE: &str = "support_notification.html";
const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y";

// Compiled into the binary so that a deployment can never run without its email bodies.
static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (
            CONFIRMATION_TEMPLATE,
            include_str!("../../templates/confirmation_email.html"),
        ),
        (
            SUPPORT_TEMPLATE,
            include_str!("../../templates/support_notification.html"),
        ),
    ])
    .expect("Failed to compile the email templates");
    tera
});

/// Named fields handed to the email service's stored template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TemplateParams {
    pub to_email: String,
    pub to_name: String,
    pub from_name: String,
    pub location: String,
    pub event_type: String,
    pub formatted_date: String,
    pub booking_ref: String,
    pub reply_to: String,
    pub current_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub html_content: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SummaryLine {
    pub label: &'static str,
    pub value: String,
}

impl SummaryLine {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Human-readable rendition of a submission, shared by the mail-client draft and the
/// support notification.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Summary {
    pub subject: String,
    pub heading: String,
    pub registrant: Vec<SummaryLine>,
    pub event: Vec<SummaryLine>,
}

impl Summary {
    pub fn of(submission: &Submission) -> Self {
        match submission {
            Submission::Interest(r) => {
                let event_type = event_type_label(&r.event_type_code);
                Self {
                    subject: format!("New Registration: {event_type}"),
                    heading: "New registration of interest:".into(),
                    registrant: vec![
                        SummaryLine::new("Name", r.name.as_ref()),
                        SummaryLine::new("Email", r.email.as_ref()),
                        SummaryLine::new("Preferred Location", location_label(&r.location_code)),
                        SummaryLine::new("Event Type", event_type),
                    ],
                    event: vec![],
                }
            }
            Submission::Booking(b) => Self {
                subject: format!("New Registration for {}", b.event.title),
                heading: format!("New registration for {}:", b.event.title),
                registrant: vec![
                    SummaryLine::new("Name", b.name.as_ref()),
                    SummaryLine::new("Email", b.email.as_ref()),
                    SummaryLine::new("Phone", b.phone.as_str()),
                    SummaryLine::new("Company", or_placeholder(&b.company, "Not provided")),
                    SummaryLine::new("Number of Attendees", b.attendee_count.to_string()),
                    SummaryLine::new("Preferred Date", display_date(b.preferred_date)),
                    SummaryLine::new(
                        "Dietary Requirements",
                        or_placeholder(&b.dietary_requirements, "None"),
                    ),
                    SummaryLine::new("Questions", or_placeholder(&b.questions, "None")),
                    SummaryLine::new(
                        "Marketing Consent",
                        if b.marketing_consent { "Yes" } else { "No" },
                    ),
                ],
                event: vec![
                    SummaryLine::new("Title", b.event.title.as_str()),
                    SummaryLine::new("Price", b.event.price.as_str()),
                    SummaryLine::new("Location", b.event.location.as_str()),
                    SummaryLine::new("Date", b.event.date.as_str()),
                    SummaryLine::new("Time", b.event.time.as_str()),
                ],
            },
        }
    }

    pub fn to_plain_text(&self) -> String {
        let mut text = format!("{}\n\n", self.heading);
        for line in &self.registrant {
            text.push_str(&format!("{}: {}\n", line.label, line.value));
        }
        if !self.event.is_empty() {
            text.push_str("\nEvent Details:\n");
            for line in &self.event {
                text.push_str(&format!("{}: {}\n", line.label, line.value));
            }
        }
        text
    }
}

/// Template fields and HTML body of the confirmation sent to the registrant.
pub fn confirmation_params(
    submission: &Submission,
    reference: &BookingReference,
    correspondence: &CorrespondenceSettings,
    today: NaiveDate,
) -> Result<TemplateParams, tera::Error> {
    let labels = Labels::of(submission, today);

    let mut context = Context::new();
    context.insert("host_name", &correspondence.host_name);
    context.insert("from_name", &correspondence.from_name);
    context.insert("website_url", &correspondence.website_url);
    context.insert("support_address", &correspondence.support_address);
    context.insert("current_year", &today.year());
    context.insert("name", submission.name().as_ref());
    context.insert("email", submission.email().as_ref());
    context.insert("event_type", &labels.event_type);
    context.insert("location", &labels.location);
    context.insert("date_label", labels.date_label);
    context.insert("formatted_date", &labels.formatted_date);
    context.insert("booking_reference", reference.as_ref());
    match submission {
        Submission::Booking(b) => context.insert(
            "booking",
            &serde_json::json!({
                "event_date": b.event.date,
                "event_time": b.event.time,
                "attendee_count": b.attendee_count.get(),
                "price": b.event.price,
            }),
        ),
        Submission::Interest(_) => context.insert("booking", &Option::<()>::None),
    }
    let html_content = TEMPLATES.render(CONFIRMATION_TEMPLATE, &context)?;

    Ok(TemplateParams {
        to_email: submission.email().to_string(),
        to_name: submission.name().to_string(),
        from_name: correspondence.from_name.clone(),
        location: labels.location,
        event_type: labels.event_type,
        formatted_date: labels.formatted_date,
        booking_ref: reference.to_string(),
        reply_to: correspondence.reply_to.clone(),
        current_year: today.year(),
        message: None,
        html_content,
    })
}

/// Template fields and HTML body of the notice forwarded to the support address. Replies go
/// straight to the registrant.
pub fn support_params(
    submission: &Submission,
    reference: &BookingReference,
    correspondence: &CorrespondenceSettings,
    today: NaiveDate,
) -> Result<TemplateParams, tera::Error> {
    let labels = Labels::of(submission, today);
    let summary = Summary::of(submission);

    let mut context = Context::new();
    context.insert("event_type", &labels.event_type);
    context.insert("booking_reference", reference.as_ref());
    context.insert("heading", &summary.heading);
    context.insert("registrant", &summary.registrant);
    context.insert("event", &summary.event);
    let html_content = TEMPLATES.render(SUPPORT_TEMPLATE, &context)?;

    Ok(TemplateParams {
        to_email: correspondence.support_address.clone(),
        to_name: "Support Team".into(),
        from_name: submission.name().to_string(),
        location: labels.location,
        event_type: labels.event_type,
        formatted_date: labels.formatted_date,
        booking_ref: reference.to_string(),
        reply_to: submission.email().to_string(),
        current_year: today.year(),
        message: Some(summary.to_plain_text()),
        html_content,
    })
}

struct Labels {
    location: String,
    event_type: String,
    date_label: &'static str,
    formatted_date: String,
}

impl Labels {
    fn of(submission: &Submission, today: NaiveDate) -> Self {
        match submission {
            Submission::Interest(r) => Self {
                location: location_label(&r.location_code),
                event_type: event_type_label(&r.event_type_code),
                date_label: "Date Registered",
                formatted_date: display_date(today),
            },
            Submission::Booking(b) => Self {
                location: b.event.location.clone(),
                event_type: b.event.title.clone(),
                date_label: "Preferred Date",
                formatted_date: display_date(b.preferred_date),
            },
        }
    }
}

fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

fn or_placeholder(value: &Option<String>, placeholder: &str) -> String {
    value.clone().unwrap_or_else(|| placeholder.to_string())
}
