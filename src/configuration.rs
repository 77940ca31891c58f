use crate::domain::{AvailabilityPolicy, EmailAddress, EventOffering};
use chrono::Weekday;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use std::convert::{TryFrom, TryInto};

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
    pub correspondence: CorrespondenceSettings,
    pub booking: BookingSettings,
    #[serde(default)]
    pub events: Vec<EventOffering>,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

/// Credentials and template identifiers of the transactional email API. None of these are
/// baked into the binary: `base.yaml` only carries placeholders, real values come from the
/// environment (`APP_EMAIL_CLIENT__PRIVATE_KEY`, ...).
#[derive(serde::Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub service_id: String,
    pub public_key: String,
    pub private_key: Secret<String>,
    pub confirmation_template_id: String,
    pub support_template_id: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }

    /// Fails if any of the values needed to talk to the email API is blank.
    pub fn check(&self) -> Result<(), ConfigurationError> {
        let required = [
            ("email_client.base_url", self.base_url.as_str()),
            ("email_client.service_id", self.service_id.as_str()),
            ("email_client.public_key", self.public_key.as_str()),
            ("email_client.private_key", self.private_key.expose_secret().as_str()),
            (
                "email_client.confirmation_template_id",
                self.confirmation_template_id.as_str(),
            ),
            (
                "email_client.support_template_id",
                self.support_template_id.as_str(),
            ),
        ];
        if let Some((key, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigurationError::Missing(*key));
        }
        if self.timeout_milliseconds == 0 {
            return Err(ConfigurationError::Invalid {
                key: "email_client.timeout_milliseconds",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

/// Who the outgoing correspondence is from and what it points back to.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct CorrespondenceSettings {
    pub host_name: String,
    pub from_name: String,
    pub reply_to: String,
    pub support_address: String,
    pub website_url: String,
}

impl CorrespondenceSettings {
    pub fn check(&self) -> Result<(), ConfigurationError> {
        EmailAddress::parse(self.reply_to.clone()).map_err(|reason| {
            ConfigurationError::Invalid {
                key: "correspondence.reply_to",
                reason,
            }
        })?;
        EmailAddress::parse(self.support_address.clone()).map_err(|reason| {
            ConfigurationError::Invalid {
                key: "correspondence.support_address",
                reason,
            }
        })?;
        Ok(())
    }
}

#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Hand a pre-filled draft to the visitor's own mail client.
    Mailto,
    /// Send through the transactional email API.
    Api,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct BookingSettings {
    pub transport: TransportKind,
    pub mailto_recipient: String,
    pub reference_prefix: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub window_margin_days: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub open_horizon_days: u32,
    #[serde(default)]
    pub excluded_weekdays: Vec<Weekday>,
}

/// Upper bounds for the booking window settings.
const MAX_WINDOW_MARGIN_DAYS: u32 = 365;
const MAX_OPEN_HORIZON_DAYS: u32 = 3 * 365;

impl BookingSettings {
    /// Fails on a blank reference prefix or a window that is empty or out of bounds.
    pub fn check(&self) -> Result<(), ConfigurationError> {
        if self.reference_prefix.trim().is_empty() {
            return Err(ConfigurationError::Missing("booking.reference_prefix"));
        }
        if self.window_margin_days > MAX_WINDOW_MARGIN_DAYS {
            return Err(ConfigurationError::Invalid {
                key: "booking.window_margin_days",
                reason: format!("must be at most {MAX_WINDOW_MARGIN_DAYS}"),
            });
        }
        if !(1..=MAX_OPEN_HORIZON_DAYS).contains(&self.open_horizon_days) {
            return Err(ConfigurationError::Invalid {
                key: "booking.open_horizon_days",
                reason: format!("must be between 1 and {MAX_OPEN_HORIZON_DAYS}"),
            });
        }
        Ok(())
    }

    pub fn availability_policy(&self) -> AvailabilityPolicy {
        AvailabilityPolicy {
            margin_days: self.window_margin_days,
            open_horizon_days: self.open_horizon_days,
            excluded_weekdays: self.excluded_weekdays.clone(),
        }
    }

    pub fn mailto_recipient(&self) -> Result<EmailAddress, ConfigurationError> {
        EmailAddress::parse(self.mailto_recipient.clone()).map_err(|reason| {
            ConfigurationError::Invalid {
                key: "booking.mailto_recipient",
                reason,
            }
        })
    }
}

/// Raised while building the application, never per submission.
#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing configuration value `{0}`")]
    Missing(&'static str),
    #[error("Invalid configuration value `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("Event id {0} is configured more than once")]
    DuplicateEvent(u32),
    #[error("Failed to build the email client")]
    HttpClient(#[source] reqwest::Error),
}

/// The possible runtime environment for our application.
#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Detect the running environment. Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.");
    get_configuration_for(environment)
}

/// Layers `base.yaml`, the file of `environment` and the `APP_` variables.
pub fn get_configuration_for(environment: Environment) -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_APPLICATION__PORT=5001` would set `Settings.application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
