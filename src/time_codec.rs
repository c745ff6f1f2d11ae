/// Parses "MM:SS" style text into a number of seconds.
///
/// Exactly one ':' separator is accepted and both sides must be plain ASCII
/// digits. Anything else yields `None`; this is queried on every keystroke so
/// it never panics.
pub fn parse(text: &str) -> Option<u32> {
    let (minutes, seconds) = text.split_once(':')?;
    if seconds.contains(':') {
        return None;
    }

    let minutes = parse_digits(minutes)?;
    let seconds = parse_digits(seconds)?;

    minutes.checked_mul(60)?.checked_add(seconds)
}

/// Formats seconds as zero padded "MM:SS".
pub fn format(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

fn parse_digits(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
