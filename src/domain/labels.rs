//! Display names for the codes the registration form submits.

pub fn event_type_label(code: &str) -> String {
    match code {
        "meetgreet" => "Meet & Greet".into(),
        "dinner" => "VIP Dinner".into(),
        "workshop" => "Workshop".into(),
        "qa" => "Q&A Session".into(),
        other => other.into(),
    }
}

pub fn location_label(code: &str) -> String {
    match code {
        "london" => "London".into(),
        "manchester" => "Manchester".into(),
        "newyork" => "New York".into(),
        "losangeles" => "Los Angeles".into(),
        "other" => "Other".into(),
        other => capitalize_first(other),
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
