//! Wager range calculation
//!
//! Turns a bid and a slippage tolerance into the closed acceptance range the
//! matchmaking contract uses to pair two players. Slippage is a fraction
//! (`0.2` means 20%); the display layer multiplies by 100.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Settings produced by one game-configuration action.
///
/// Immutable once computed; handed to the matchmaking integration as-is.
/// Deserialized values are checked against the same invariants `compute`
/// establishes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWagerSettings")]
pub struct WagerSettings {
    bid: f64,
    range_from: f64,
    range_to: f64,
}

impl WagerSettings {
    /// Compute the acceptance range for `bid` with the given `slippage`.
    ///
    /// Requires `bid > 0` (finite) and `0 <= slippage < 1`. The bid is never
    /// clamped against a balance here; that policy belongs to the caller.
    pub fn compute(bid: f64, slippage: f64) -> Result<Self> {
        if !bid.is_finite() || bid <= 0.0 {
            return Err(Error::InvalidWager(format!(
                "bid must be a positive finite number, got {}",
                bid
            )));
        }
        if !(0.0..1.0).contains(&slippage) {
            return Err(Error::InvalidWager(format!(
                "slippage must be in [0, 1), got {}",
                slippage
            )));
        }

        Ok(Self {
            bid,
            range_from: bid * (1.0 - slippage),
            range_to: bid * (1.0 + slippage),
        })
    }

    /// The stake the player commits
    pub fn bid(&self) -> f64 {
        self.bid
    }

    /// Lowest opponent bid accepted
    pub fn range_from(&self) -> f64 {
        self.range_from
    }

    /// Highest opponent bid accepted
    pub fn range_to(&self) -> f64 {
        self.range_to
    }

    /// Width of the acceptance range (`2 * bid * slippage`)
    pub fn width(&self) -> f64 {
        self.range_to - self.range_from
    }

    /// Slippage recovered from the range
    pub fn slippage(&self) -> f64 {
        (self.range_to - self.bid) / self.bid
    }

    /// Whether an opponent's bid falls inside the inclusive range
    pub fn accepts(&self, opponent_bid: f64) -> bool {
        (self.range_from..=self.range_to).contains(&opponent_bid)
    }
}

#[derive(Deserialize)]
struct RawWagerSettings {
    bid: f64,
    range_from: f64,
    range_to: f64,
}

impl TryFrom<RawWagerSettings> for WagerSettings {
    type Error = Error;

    fn try_from(raw: RawWagerSettings) -> Result<Self> {
        let RawWagerSettings {
            bid,
            range_from,
            range_to,
        } = raw;
        if !bid.is_finite() || bid <= 0.0 {
            return Err(Error::InvalidWager(format!(
                "bid must be a positive finite number, got {}",
                bid
            )));
        }
        // range_to < 2 * bid keeps the implied slippage below 1
        if !(0.0 <= range_from && range_from <= bid && bid <= range_to && range_to < 2.0 * bid) {
            return Err(Error::InvalidWager(format!(
                "range {}..={} does not bracket bid {}",
                range_from, range_to, bid
            )));
        }
        Ok(Self {
            bid,
            range_from,
            range_to,
        })
    }
}

/// Bounds the game constructor offers on its sliders.
///
/// These only shape what the UI presents. [`WagerSettings::compute`] accepts
/// any valid bid regardless of these limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WagerLimits {
    /// Smallest selectable bid
    pub bid_min: f64,
    /// Largest selectable bid before balance clamping
    pub bid_max: f64,
    /// Bid slider step
    pub bid_step: f64,
    /// Smallest selectable slippage
    pub slippage_min: f64,
    /// Largest selectable slippage
    pub slippage_max: f64,
    /// Slippage slider step
    pub slippage_step: f64,
    /// Initial bid
    pub default_bid: f64,
    /// Initial slippage
    pub default_slippage: f64,
}

impl Default for WagerLimits {
    fn default() -> Self {
        Self {
            bid_min: 0.2,
            bid_max: 3.0,
            bid_step: 0.2,
            slippage_min: 0.04,
            slippage_max: 0.3,
            slippage_step: 0.02,
            default_bid: 0.4,
            default_slippage: 0.2,
        }
    }
}

impl WagerLimits {
    /// Display maximum for the bid slider given the live balance
    pub fn effective_max_bid(&self, balance: f64) -> f64 {
        if balance.is_finite() {
            self.bid_max.min(balance.max(0.0))
        } else {
            self.bid_max
        }
    }

    /// Value the bid slider shows for `bid` when the balance caps the maximum
    pub fn displayed_bid(&self, bid: f64, balance: f64) -> f64 {
        bid.min(self.effective_max_bid(balance))
    }

    /// Format a slippage fraction as the percentage label the UI shows
    pub fn format_slippage(slippage: f64) -> String {
        format!("{:.1}%", slippage * 100.0)
    }

    /// Check that the limits describe usable sliders
    pub fn validate(&self) -> Result<()> {
        if !(self.bid_min > 0.0 && self.bid_min <= self.bid_max && self.bid_step > 0.0) {
            return Err(Error::Config(format!(
                "bid limits are inconsistent: min={} max={} step={}",
                self.bid_min, self.bid_max, self.bid_step
            )));
        }
        if !(0.0 <= self.slippage_min
            && self.slippage_min <= self.slippage_max
            && self.slippage_max < 1.0
            && self.slippage_step > 0.0)
        {
            return Err(Error::Config(format!(
                "slippage limits are inconsistent: min={} max={} step={}",
                self.slippage_min, self.slippage_max, self.slippage_step
            )));
        }
        if !(self.bid_min..=self.bid_max).contains(&self.default_bid)
            || !(self.slippage_min..=self.slippage_max).contains(&self.default_slippage)
        {
            return Err(Error::Config(
                "default bid or slippage lies outside the slider range".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_reference_scenario() {
        let settings = WagerSettings::compute(0.4, 0.2).unwrap();
        assert_eq!(settings.bid(), 0.4);
        assert!((settings.range_from() - 0.32).abs() < EPS);
        assert!((settings.range_to() - 0.48).abs() < EPS);
    }

    #[test]
    fn test_zero_slippage_collapses_range() {
        let settings = WagerSettings::compute(1.5, 0.0).unwrap();
        assert_eq!(settings.range_from(), 1.5);
        assert_eq!(settings.range_to(), 1.5);
        assert_eq!(settings.width(), 0.0);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        for (bid, slippage) in [
            (0.0, 0.2),
            (-1.0, 0.2),
            (1.0, 1.0),
            (1.0, -0.01),
            (f64::NAN, 0.1),
            (f64::INFINITY, 0.1),
            (1.0, f64::NAN),
        ] {
            let err = WagerSettings::compute(bid, slippage).unwrap_err();
            assert!(matches!(err, Error::InvalidWager(_)), "{} {}", bid, slippage);
        }
    }

    #[test]
    fn test_bid_is_not_clamped() {
        // Far above any slider maximum; still accepted verbatim
        let settings = WagerSettings::compute(1_000.0, 0.1).unwrap();
        assert_eq!(settings.bid(), 1_000.0);
    }

    #[test]
    fn test_accepts_is_inclusive() {
        let settings = WagerSettings::compute(1.0, 0.25).unwrap();
        assert!(settings.accepts(0.75));
        assert!(settings.accepts(1.25));
        assert!(settings.accepts(1.0));
        assert!(!settings.accepts(0.74));
        assert!(!settings.accepts(1.26));
    }

    #[test]
    fn test_slippage_recovered() {
        let settings = WagerSettings::compute(2.0, 0.3).unwrap();
        assert!((settings.slippage() - 0.3).abs() < EPS);
    }

    #[test]
    fn test_deserialize_checks_invariants() {
        let settings = WagerSettings::compute(0.4, 0.2).unwrap();
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(serde_json::from_str::<WagerSettings>(&json).unwrap(), settings);

        for json in [
            r#"{"bid":-1.0,"range_from":5.0,"range_to":0.0}"#,
            r#"{"bid":0.0,"range_from":0.0,"range_to":0.0}"#,
            r#"{"bid":1.0,"range_from":1.2,"range_to":1.5}"#,
            r#"{"bid":1.0,"range_from":-0.1,"range_to":1.1}"#,
            r#"{"bid":1.0,"range_from":0.5,"range_to":2.0}"#,
        ] {
            assert!(serde_json::from_str::<WagerSettings>(json).is_err(), "{}", json);
        }
    }

    #[test]
    fn test_effective_max_bid() {
        let limits = WagerLimits::default();
        assert_eq!(limits.effective_max_bid(10.0), 3.0);
        assert_eq!(limits.effective_max_bid(1.2), 1.2);
        assert_eq!(limits.effective_max_bid(-5.0), 0.0);
        assert_eq!(limits.effective_max_bid(f64::NAN), 3.0);
        assert_eq!(limits.displayed_bid(2.0, 1.2), 1.2);
    }

    #[test]
    fn test_format_slippage() {
        assert_eq!(WagerLimits::format_slippage(0.2), "20.0%");
        assert_eq!(WagerLimits::format_slippage(0.04), "4.0%");
    }

    #[test]
    fn test_default_limits_valid() {
        assert!(WagerLimits::default().validate().is_ok());

        let broken = WagerLimits {
            slippage_max: 1.0,
            ..Default::default()
        };
        assert!(broken.validate().is_err());
    }
}
