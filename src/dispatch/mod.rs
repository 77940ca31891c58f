//! Delivering a validated submission to a human being.
//!
//! Two transports are supported and picked at startup: handing a pre-filled draft to the
//! visitor's own mail client, or sending through the transactional email API.
mod mailto;
mod payload;

pub use mailto::MailtoLink;
pub use payload::{confirmation_params, support_params, Summary, SummaryLine, TemplateParams};

use crate::configuration::{ConfigurationError, CorrespondenceSettings, Settings, TransportKind};
use crate::domain::{BookingReference, EmailAddress, Submission};
use crate::email_client::{EmailClient, EmailClientError};
use crate::utils::error_chain_fmt;
use chrono::NaiveDate;

pub enum Transport {
    Mailto(MailtoTransport),
    Api(ApiTransport),
}

pub struct MailtoTransport {
    recipient: EmailAddress,
}

pub struct ApiTransport {
    client: EmailClient,
    confirmation_template_id: String,
    support_template_id: String,
    correspondence: CorrespondenceSettings,
}

/// How a submission left the building.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// A draft was handed to the visitor's mail client. Whether it is ever sent is out of
    /// our sight.
    MailClient { mailto_link: MailtoLink },
    EmailService { support_notice: SupportNotice },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportNotice {
    NotRequested,
    Sent,
    /// The registrant's confirmation went out but support never heard about it.
    Failed,
}

#[derive(thiserror::Error)]
pub enum DispatchError {
    #[error("Failed to render the email body")]
    Render(#[from] tera::Error),
    #[error("Failed to send the confirmation email")]
    Delivery(#[from] EmailClientError),
}

impl std::fmt::Debug for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl Transport {
    /// Builds the transport selected in the configuration, checking everything it needs up
    /// front so that a misconfiguration stops the application from starting.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigurationError> {
        settings.correspondence.check()?;
        match settings.booking.transport {
            TransportKind::Mailto => Ok(Self::Mailto(MailtoTransport {
                recipient: settings.booking.mailto_recipient()?,
            })),
            TransportKind::Api => {
                let email_client = &settings.email_client;
                email_client.check()?;
                let client = EmailClient::new(
                    email_client.base_url.clone(),
                    email_client.service_id.clone(),
                    email_client.public_key.clone(),
                    email_client.private_key.clone(),
                    email_client.timeout(),
                )
                .map_err(ConfigurationError::HttpClient)?;
                Ok(Self::Api(ApiTransport {
                    client,
                    confirmation_template_id: email_client.confirmation_template_id.clone(),
                    support_template_id: email_client.support_template_id.clone(),
                    correspondence: settings.correspondence.clone(),
                }))
            }
        }
    }

    #[tracing::instrument(
        name = "Dispatching a submission",
        skip(self, submission, today),
        fields(booking_reference = %reference)
    )]
    pub async fn dispatch(
        &self,
        submission: &Submission,
        reference: &BookingReference,
        today: NaiveDate,
    ) -> Result<Delivery, DispatchError> {
        match self {
            Transport::Mailto(mailto) => Ok(mailto.dispatch(submission)),
            Transport::Api(api) => api.dispatch(submission, reference, today).await,
        }
    }
}

impl MailtoTransport {
    fn dispatch(&self, submission: &Submission) -> Delivery {
        let summary = Summary::of(submission);
        let mailto_link =
            MailtoLink::new(&self.recipient, &summary.subject, &summary.to_plain_text());
        Delivery::MailClient { mailto_link }
    }
}

impl ApiTransport {
    async fn dispatch(
        &self,
        submission: &Submission,
        reference: &BookingReference,
        today: NaiveDate,
    ) -> Result<Delivery, DispatchError> {
        // Render everything before the first call: a template failure must not leave a
        // confirmation sent without its support notice.
        let confirmation = confirmation_params(submission, reference, &self.correspondence, today)?;
        let support = if submission.needs_support_notice() {
            Some(support_params(
                submission,
                reference,
                &self.correspondence,
                today,
            )?)
        } else {
            None
        };

        self.client
            .send_template(&self.confirmation_template_id, &confirmation)
            .await?;

        let support_notice = match support {
            None => SupportNotice::NotRequested,
            Some(params) => match self
                .client
                .send_template(&self.support_template_id, &params)
                .await
            {
                Ok(()) => SupportNotice::Sent,
                Err(error) => {
                    tracing::error!(
                        error.cause_chain = ?error,
                        error.message = %error,
                        booking_reference = %reference,
                        "The confirmation was sent but the support notification failed"
                    );
                    SupportNotice::Failed
                }
            },
        };

        Ok(Delivery::EmailService { support_notice })
    }
}
