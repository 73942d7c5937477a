use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_THRESHOLD_STEP;
use crate::error::{Result, SegmentError};

/// A threshold setting: one literal value or a half-open range to sweep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ThresholdSpec {
    Single(f64),
    /// `start, start + step, ...` strictly below `stop`.
    Range { start: f64, stop: f64, step: f64 },
}

/// Rewrite the human-readable range delimiters (`-` and `by`) to commas.
///
/// `"0.1-0.3 by 0.05"` becomes `"0.1,0.3 , 0.05"`. A leading minus sign is
/// rewritten as well, so negative thresholds cannot be expressed.
pub fn normalize_threshold_spec(spec: &str) -> String {
    spec.replace('-', ",").replace("by", ",")
}

/// Split a threshold specification into its numeric tokens.
pub fn threshold_tokens(spec: &str) -> Result<Vec<f64>> {
    let normalized = normalize_threshold_spec(spec);
    normalized
        .split(',')
        .map(|token| {
            let token = token.trim();
            if token.is_empty() {
                return Err(SegmentError::InvalidThreshold(format!(
                    "empty value in '{spec}'"
                )));
            }
            token.parse::<f64>().map_err(|_| {
                SegmentError::InvalidThreshold(format!("'{token}' is not a number in '{spec}'"))
            })
        })
        .collect()
}

impl ThresholdSpec {
    /// Parse and validate a threshold specification.
    pub fn parse(spec: &str) -> Result<Self> {
        let tokens = threshold_tokens(spec)?;
        let parsed = match tokens.as_slice() {
            [value] => Self::Single(*value),
            [start, stop] => Self::Range {
                start: *start,
                stop: *stop,
                step: DEFAULT_THRESHOLD_STEP,
            },
            [start, stop, step] => Self::Range {
                start: *start,
                stop: *stop,
                step: *step,
            },
            _ => return Err(SegmentError::TooManyThresholdTokens(tokens.len())),
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Check that every value lies in `[0, 1]` and a range is non-empty.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Single(value) => check_unit_interval(value),
            Self::Range { start, stop, step } => {
                if !step.is_finite() || step <= 0.0 {
                    return Err(SegmentError::InvalidThreshold(format!(
                        "step must be positive, got {step}"
                    )));
                }
                if !start.is_finite() || !stop.is_finite() || start >= stop {
                    return Err(SegmentError::InvalidThreshold(format!(
                        "range {start} to {stop} is empty"
                    )));
                }
                self.values().into_iter().try_for_each(check_unit_interval)
            }
        }
    }

    /// Number of thresholds the specification expands to.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Range { .. } => self.values().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every threshold in ascending order.
    ///
    /// The step count is rounded up, so rounding error in `stop - start` can
    /// produce one candidate at (or just past) `stop`; it is dropped to keep
    /// the range half-open.
    pub fn values(&self) -> Vec<f64> {
        match *self {
            Self::Single(value) => vec![value],
            Self::Range { start, stop, step } => {
                let count = ((stop - start) / step).ceil().max(0.0) as usize;
                (0..count)
                    .map(|i| start + i as f64 * step)
                    .filter(|&value| value < stop)
                    .collect()
            }
        }
    }
}

fn check_unit_interval(value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SegmentError::InvalidThreshold(format!(
            "{value} is outside [0, 1]"
        )))
    }
}

impl FromStr for ThresholdSpec {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Default for ThresholdSpec {
    fn default() -> Self {
        Self::Single(crate::consts::DEFAULT_THRESHOLD)
    }
}

impl fmt::Display for ThresholdSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(value) => write!(f, "{value}"),
            Self::Range { start, stop, step } => write!(f, "{start}-{stop}-{step}"),
        }
    }
}
