/// Number of people a booking is made for. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendeeCount(u32);

impl AttendeeCount {
    /// The form submits the count as text.
    pub fn parse(s: &str) -> Result<AttendeeCount, String> {
        match s.trim().parse::<u32>() {
            Ok(count) if count >= 1 => Ok(Self(count)),
            _ => Err(format!("{s} is not a valid number of attendees.")),
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for AttendeeCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
