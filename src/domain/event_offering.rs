use crate::configuration::ConfigurationError;
use chrono::NaiveDate;
use std::collections::HashSet;

const EVENT_DATE_FORMAT: &str = "%B %d, %Y";

/// Placeholder shown for every event detail when the selected event cannot be found.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Calendar date of an event, written the way the site shows it: `June 15, 2024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDate(NaiveDate);

impl EventDate {
    pub fn parse(s: &str) -> Result<EventDate, String> {
        NaiveDate::parse_from_str(s.trim(), EVENT_DATE_FORMAT)
            .map(Self)
            .map_err(|e| format!("{s} is not a valid event date: {e}"))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl std::fmt::Display for EventDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%B %-d, %Y"))
    }
}

impl<'de> serde::Deserialize<'de> for EventDate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        EventDate::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for EventDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A bookable event as listed on the site.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct EventOffering {
    pub id: u32,
    pub title: String,
    pub date: EventDate,
    pub time: String,
    pub location: String,
    pub spots: String,
    pub price: String,
    #[serde(default)]
    pub featured: bool,
}

/// The fixed list of offered events, keyed by id.
#[derive(Debug, Clone)]
pub struct EventCatalog {
    offerings: Vec<EventOffering>,
}

impl EventCatalog {
    pub fn new(offerings: Vec<EventOffering>) -> Result<Self, ConfigurationError> {
        let mut seen = HashSet::new();
        for offering in &offerings {
            if !seen.insert(offering.id) {
                return Err(ConfigurationError::DuplicateEvent(offering.id));
            }
        }
        Ok(Self { offerings })
    }

    pub fn offerings(&self) -> &[EventOffering] {
        &self.offerings
    }

    pub fn get(&self, id: u32) -> Option<&EventOffering> {
        self.offerings.iter().find(|o| o.id == id)
    }

    /// Resolves the identifier picked on the multi-event form. Anything that does not name
    /// an offered event, including a missing or non-numeric id, yields placeholder details.
    pub fn resolve(&self, selected: Option<&str>) -> EventDetails {
        selected
            .and_then(|id| id.trim().parse::<u32>().ok())
            .and_then(|id| self.get(id))
            .map(EventDetails::from)
            .unwrap_or_else(EventDetails::not_specified)
    }
}

/// Event details quoted in correspondence about a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub title: String,
    pub price: String,
    pub location: String,
    pub date: String,
    pub time: String,
    /// Parsed event date, absent when the event is not specified.
    pub scheduled_on: Option<NaiveDate>,
}

impl EventDetails {
    pub fn not_specified() -> Self {
        Self {
            title: NOT_SPECIFIED.into(),
            price: NOT_SPECIFIED.into(),
            location: NOT_SPECIFIED.into(),
            date: NOT_SPECIFIED.into(),
            time: NOT_SPECIFIED.into(),
            scheduled_on: None,
        }
    }

    pub fn is_specified(&self) -> bool {
        self.scheduled_on.is_some()
    }
}

impl From<&EventOffering> for EventDetails {
    fn from(offering: &EventOffering) -> Self {
        Self {
            title: offering.title.clone(),
            price: offering.price.clone(),
            location: offering.location.clone(),
            date: offering.date.to_string(),
            time: offering.time.clone(),
            scheduled_on: Some(offering.date.date()),
        }
    }
}
