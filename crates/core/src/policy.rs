//! Named strategy choices for the range calculation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default padding, in strikes, for fixed-offset outer legs.
pub const DEFAULT_PADDING_STEPS: i64 = 4;

/// Default band multiplier for second-band outer legs.
pub const DEFAULT_OUTER_SD_MULTIPLIER: f64 = 1.3;

/// How the two bought (outer) legs of the condor are placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OuterLegPolicy {
    /// Outer legs sit a fixed number of strikes beyond the inner legs.
    FixedOffset { padding_steps: i64 },
    /// Outer legs come from a second, wider volatility band.
    SecondBand { sd_multiplier: f64 },
}

impl Default for OuterLegPolicy {
    fn default() -> Self {
        Self::FixedOffset {
            padding_steps: DEFAULT_PADDING_STEPS,
        }
    }
}

impl fmt::Display for OuterLegPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedOffset { padding_steps } => write!(f, "fixed:{padding_steps}"),
            Self::SecondBand { sd_multiplier } => write!(f, "band:{sd_multiplier}"),
        }
    }
}

/// Failure to parse a policy from its command-line form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyParseError {
    #[error("invalid outer leg policy '{0}' (expected fixed:<steps> or band:<multiplier>)")]
    OuterLegs(String),

    #[error("invalid rounding mode '{0}' (expected nearest, floor or ceiling)")]
    Rounding(String),
}

impl FromStr for OuterLegPolicy {
    type Err = PolicyParseError;

    /// Accepts `fixed`, `fixed:<steps>`, `band` and `band:<multiplier>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PolicyParseError::OuterLegs(s.to_string());
        let (kind, arg) = match s.trim().split_once(':') {
            Some((k, a)) => (k.trim(), Some(a.trim())),
            None => (s.trim(), None),
        };

        match kind.to_ascii_lowercase().as_str() {
            "fixed" | "fixed_offset" => {
                let padding_steps = match arg {
                    Some(a) => a.parse().map_err(|_| err())?,
                    None => DEFAULT_PADDING_STEPS,
                };
                Ok(Self::FixedOffset { padding_steps })
            }
            "band" | "second_band" => {
                let sd_multiplier = match arg {
                    Some(a) => a.parse().map_err(|_| err())?,
                    None => DEFAULT_OUTER_SD_MULTIPLIER,
                };
                Ok(Self::SecondBand { sd_multiplier })
            }
            _ => Err(err()),
        }
    }
}

/// What to do when an implied volatility quote is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingQuotePolicy {
    /// Abort the calculation with a missing-quote error.
    #[default]
    Reject,
    /// Substitute 0%, which narrows the band toward zero volatility.
    TreatAsZero,
}

/// Whether the start day counts once or twice toward time to expiry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCountConvention {
    /// Weekdays in `[start, end]`, both ends included.
    #[default]
    Inclusive,
    /// Inclusive count plus one: today is treated as not yet elapsed.
    InclusivePlusOne,
}

/// Rounding applied when snapping a price onto the strike grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Nearest multiple, ties away from zero.
    Nearest,
    Floor,
    #[default]
    Ceiling,
}

impl FromStr for RoundingMode {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" | "round" => Ok(Self::Nearest),
            "floor" | "down" => Ok(Self::Floor),
            "ceiling" | "ceil" | "up" => Ok(Self::Ceiling),
            _ => Err(PolicyParseError::Rounding(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Outer Leg Policy Tests ====================

    #[test]
    fn test_outer_policy_parses_short_forms() {
        assert_eq!(
            "fixed".parse::<OuterLegPolicy>().unwrap(),
            OuterLegPolicy::FixedOffset { padding_steps: 4 }
        );
        assert_eq!(
            "fixed:6".parse::<OuterLegPolicy>().unwrap(),
            OuterLegPolicy::FixedOffset { padding_steps: 6 }
        );
        assert_eq!(
            "band".parse::<OuterLegPolicy>().unwrap(),
            OuterLegPolicy::SecondBand { sd_multiplier: 1.3 }
        );
        assert_eq!(
            "band:1.5".parse::<OuterLegPolicy>().unwrap(),
            OuterLegPolicy::SecondBand { sd_multiplier: 1.5 }
        );
    }

    #[test]
    fn test_outer_policy_rejects_garbage() {
        assert!("wide".parse::<OuterLegPolicy>().is_err());
        assert!("fixed:x".parse::<OuterLegPolicy>().is_err());
        assert!("band:".parse::<OuterLegPolicy>().is_err());
    }

    #[test]
    fn test_outer_policy_display_round_trips() {
        let policy = OuterLegPolicy::SecondBand { sd_multiplier: 1.3 };
        assert_eq!(policy.to_string().parse::<OuterLegPolicy>().unwrap(), policy);
    }

    #[test]
    fn test_outer_policy_serde_is_tagged() {
        let json = serde_json::to_value(OuterLegPolicy::default()).unwrap();
        assert_eq!(json["mode"], "fixed_offset");
        assert_eq!(json["padding_steps"], 4);
    }

    // ==================== Rounding Tests ====================

    #[test]
    fn test_rounding_mode_parses() {
        assert_eq!("round".parse::<RoundingMode>().unwrap(), RoundingMode::Nearest);
        assert_eq!("FLOOR".parse::<RoundingMode>().unwrap(), RoundingMode::Floor);
        assert_eq!("ceil".parse::<RoundingMode>().unwrap(), RoundingMode::Ceiling);
        assert!("banker".parse::<RoundingMode>().is_err());
    }

    #[test]
    fn test_default_choices() {
        assert_eq!(RoundingMode::default(), RoundingMode::Ceiling);
        assert_eq!(DayCountConvention::default(), DayCountConvention::Inclusive);
        assert_eq!(MissingQuotePolicy::default(), MissingQuotePolicy::Reject);
    }
}
