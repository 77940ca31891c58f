use crate::domain::EmailAddress;

/// A `mailto:` URI that opens a pre-filled draft in the visitor's mail client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailtoLink(String);

impl MailtoLink {
    /// Subject and body are percent-encoded, spaces included, so the draft survives
    /// every mail client's URI handling.
    pub fn new(recipient: &EmailAddress, subject: &str, body: &str) -> Self {
        Self(format!(
            "mailto:{}?subject={}&body={}",
            recipient.as_ref(),
            urlencoding::encode(subject),
            urlencoding::encode(body)
        ))
    }
}

impl AsRef<str> for MailtoLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for MailtoLink {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
