use rand::Rng;

/// Identifier quoted in every piece of correspondence about one submission, e.g. `SB-482913`.
///
/// Generated once per submission so that the registrant's confirmation and the support
/// notification always carry the same reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingReference(String);

impl BookingReference {
    /// Six random digits in `[100000, 999999]` behind the configured prefix.
    pub fn generate(prefix: &str) -> Self {
        let mut rng = rand::thread_rng();
        let number: u32 = rng.gen_range(100_000..=999_999);
        Self(format!("{prefix}-{number}"))
    }
}

impl AsRef<str> for BookingReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl serde::Serialize for BookingReference {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
