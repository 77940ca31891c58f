use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone)]
pub struct RegistrantName(String);

impl RegistrantName {
    /// Returns an instance of `RegistrantName` if the input satisfies all our validation
    /// constraints on registrant names, a description of the problem otherwise.
    pub fn parse(s: String) -> Result<RegistrantName, String> {
        let trimmed = s.trim();

        // A grapheme is defined by the Unicode standard as a "user-perceived" character: `a°` is a single
        // grapheme, but it is composed of two characters (`a` and `°`).
        let length = trimmed.graphemes(true).count();
        let is_too_short = length < 2;
        let is_too_long = length > 256;

        // The name ends up inside generated HTML and mail drafts.
        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
        let contains_forbidden_characters =
            trimmed.chars().any(|g| forbidden_characters.contains(&g));

        if is_too_short || is_too_long || contains_forbidden_characters {
            Err(format!("{s} is not a valid registrant name."))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for RegistrantName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RegistrantName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
