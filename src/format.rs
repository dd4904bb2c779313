pub const MAX_MINUTES: u32 = 999;
pub const MAX_SECONDS: u32 = 59;

/// `MM:SS`, floor-divided, never negative
pub fn format_clock(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Leading integer of `text`, the way a browser `parseInt` reads it.
/// Anything without leading digits reads as 0.
pub fn parse_leading_int(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    // Longer digit runs than fit are clamped later anyway
    digits
        .parse::<i64>()
        .map(|n| n * sign)
        .unwrap_or(if digits.is_empty() { 0 } else { sign * i64::MAX })
}

pub fn clamp_minutes(value: i64) -> u32 {
    value.clamp(0, MAX_MINUTES as i64) as u32
}

pub fn clamp_seconds(value: i64) -> u32 {
    value.clamp(0, MAX_SECONDS as i64) as u32
}

/// A minutes/seconds pair as typed into the settings form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationInput {
    pub minutes: u32,
    pub seconds: u32,
}

impl DurationInput {
    pub fn new(minutes: i64, seconds: i64) -> Self {
        Self {
            minutes: clamp_minutes(minutes),
            seconds: clamp_seconds(seconds),
        }
    }

    pub fn from_parts(minutes: &str, seconds: &str) -> Self {
        Self::new(parse_leading_int(minutes), parse_leading_int(seconds))
    }

    pub fn from_secs(total: u32) -> Self {
        Self::new((total / 60) as i64, (total % 60) as i64)
    }

    pub fn total_secs(&self) -> u32 {
        self.minutes * 60 + self.seconds
    }
}
