use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};

/// Client for the transactional email API (EmailJS REST interface).
///
/// Every message is sent by asking the service to render one of its stored templates with the
/// given template parameters.
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    service_id: String,
    public_key: String,
    private_key: Secret<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum EmailClientError {
    #[error("Failed to reach the email service")]
    Request(#[from] reqwest::Error),
    #[error("The email service answered {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

impl EmailClient {
    pub fn new(
        base_url: String,
        service_id: String,
        public_key: String,
        private_key: Secret<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        // A hung email API must not leave the submit hanging with it.
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
            service_id,
            public_key,
            private_key,
        })
    }

    #[tracing::instrument(
        name = "Sending a templated email",
        skip(self, template_params),
        fields(template_id = %template_id)
    )]
    pub async fn send_template<P: serde::Serialize>(
        &self,
        template_id: &str,
        template_params: &P,
    ) -> Result<(), EmailClientError> {
        let url = format!("{}/api/v1.0/email/send", self.base_url);
        let request_body = SendTemplateRequest {
            service_id: &self.service_id,
            template_id,
            user_id: &self.public_key,
            access_token: self.private_key.expose_secret(),
            template_params,
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailClientError::Rejected { status, body });
        }
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct SendTemplateRequest<'a, P> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken")]
    access_token: &'a str,
    template_params: &'a P,
}
