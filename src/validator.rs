use crate::time_codec;
use thiserror::Error;

/// Shortest countdown a player can configure (00:30)
pub const MIN_ALLOWED_SECONDS: u32 = 30;
/// Longest countdown a player can configure (04:00)
pub const MAX_ALLOWED_SECONDS: u32 = 240;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("times must use the MM:SS format")]
    Format,
    #[error("times must be between 00:30 and 04:00")]
    Range,
    #[error("the minimum time cannot be greater than the maximum time")]
    Order,
    #[error("countdown of {0} seconds is outside 00:30..=04:00")]
    InvalidDuration(u32),
}

impl TimeError {
    /// Format and range problems share one user facing message
    pub fn notice(&self) -> &'static str {
        match self {
            TimeError::Format | TimeError::Range => {
                "Please enter valid times in MM:SS format between 00:30 and 04:00."
            }
            TimeError::Order => "The minimum time cannot be greater than the maximum time.",
            TimeError::InvalidDuration(_) => "The countdown could not be started.",
        }
    }
}

/// The two editable endpoints of the time range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Field {
    Min,
    Max,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBound {
    pub raw_text: String,
    pub seconds: Option<u32>,
}

impl TimeBound {
    pub fn is_valid(&self) -> bool {
        self.seconds.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub min: TimeBound,
    pub max: TimeBound,
}

impl TimeRange {
    pub fn new(min_text: &str, max_text: &str) -> Self {
        Self {
            min: validate(min_text),
            max: validate(max_text),
        }
    }

    pub fn bound(&self, field: Field) -> &TimeBound {
        match field {
            Field::Min => &self.min,
            Field::Max => &self.max,
        }
    }

    /// Both bounds individually valid, then min <= max.
    pub fn check(&self) -> Result<(u32, u32), TimeError> {
        let min = check(&self.min.raw_text)?;
        let max = check(&self.max.raw_text)?;
        if min > max {
            return Err(TimeError::Order);
        }
        Ok((min, max))
    }
}

/// Checks a single bound and reports which rule it breaks.
pub fn check(text: &str) -> Result<u32, TimeError> {
    if text.len() != 5 || text.as_bytes()[2] != b':' {
        return Err(TimeError::Format);
    }
    let seconds = time_codec::parse(text).ok_or(TimeError::Format)?;
    if !(MIN_ALLOWED_SECONDS..=MAX_ALLOWED_SECONDS).contains(&seconds) {
        return Err(TimeError::Range);
    }
    Ok(seconds)
}

pub fn validate(text: &str) -> TimeBound {
    TimeBound {
        raw_text: text.to_string(),
        seconds: check(text).ok(),
    }
}
