//! Arrival-time percentiles from a chosen trip.
//!
//! The provider's destination prediction is trusted as the median. The
//! upper bands are widened in proportion to the current headway: when
//! trains are far apart, missing one costs more, so the tail is longer.

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::Serialize;
use tracing::trace;

use crate::domain::serialize_instant;

use super::config::EstimateConfig;
use super::error::EstimateError;

/// Headway at or above which service counts as infrequent (seconds).
const INFREQUENT_HEADWAY_SECS: i64 = 12 * 60;

/// Headway at or above which service counts as frequent (seconds).
const FREQUENT_HEADWAY_SECS: i64 = 6 * 60;

const DEFAULT_HEADWAY_EXPLANATION: &str =
    "Uncertainty is wider because headway could not be estimated; using a conservative default.";
const INFREQUENT_EXPLANATION: &str =
    "Uncertainty is wider because headway is large right now (service is less frequent).";
const FREQUENT_EXPLANATION: &str =
    "Uncertainty is tighter because headway is small right now (service is frequent).";
const MODERATE_EXPLANATION: &str = "Uncertainty is moderate based on current headway.";
const ALERT_EXPLANATION: &str = "Active alerts widen the uncertainty bands.";

/// Arrival estimate with uncertainty bands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EtaEstimate {
    /// Departure from the origin stop.
    #[serde(serialize_with = "serialize_instant")]
    pub depart_time: DateTime<FixedOffset>,

    /// Median arrival (the provider's prediction).
    #[serde(serialize_with = "serialize_instant")]
    pub p50_arrival: DateTime<FixedOffset>,

    /// Arrival with 80% confidence.
    #[serde(serialize_with = "serialize_instant")]
    pub p80_arrival: DateTime<FixedOffset>,

    /// Arrival with 90% confidence.
    #[serde(serialize_with = "serialize_instant")]
    pub p90_arrival: DateTime<FixedOffset>,

    /// Measured headway in seconds, if any.
    pub headway_seconds: Option<i64>,

    /// Human-readable reason for the band width.
    pub explanation: String,
}

/// Computes [`EtaEstimate`]s from trip timing.
#[derive(Debug, Clone)]
pub struct EtaEstimator {
    default_headway_secs: i64,
    p80_factor: f64,
    p90_factor: f64,
}

impl EtaEstimator {
    /// Create an estimator using the uncertainty model from `config`.
    pub fn new(config: &EstimateConfig) -> Self {
        Self {
            default_headway_secs: config.default_headway_secs,
            p80_factor: config.p80_factor,
            p90_factor: config.p90_factor,
        }
    }

    /// Estimate arrival percentiles for a trip.
    ///
    /// `second_origin_departure` is the next departure from the origin,
    /// used to measure headway. `alert_multiplier` scales the bands; values
    /// above 1.0 widen them when service alerts are active.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::Input`] if the destination arrival precedes
    /// the origin departure, if `alert_multiplier` is negative or NaN, or if
    /// a band does not fit in the representable time range.
    pub fn estimate(
        &self,
        now: DateTime<FixedOffset>,
        origin_departure: DateTime<FixedOffset>,
        destination_arrival: DateTime<FixedOffset>,
        second_origin_departure: Option<DateTime<FixedOffset>>,
        alert_multiplier: f64,
    ) -> Result<EtaEstimate, EstimateError> {
        if destination_arrival < origin_departure {
            return Err(EstimateError::Input(format!(
                "destination arrival {destination_arrival} precedes origin departure {origin_departure}"
            )));
        }

        if alert_multiplier.is_nan() || alert_multiplier < 0.0 {
            return Err(EstimateError::Input(format!(
                "alert multiplier must be a non-negative number, got {alert_multiplier}"
            )));
        }

        let headway_seconds = second_origin_departure
            .map(|second| (second - origin_departure).num_seconds())
            .filter(|&secs| secs > 0);

        let baseline = headway_seconds.unwrap_or(self.default_headway_secs);

        let p50_arrival = destination_arrival;
        let p80_arrival = widen(p50_arrival, self.p80_factor, baseline, alert_multiplier)?;
        let p90_arrival = widen(p50_arrival, self.p90_factor, baseline, alert_multiplier)?;

        let mut explanation = headway_explanation(headway_seconds).to_string();
        if alert_multiplier > 1.0 {
            explanation.push(' ');
            explanation.push_str(ALERT_EXPLANATION);
        }

        trace!(%now, ?headway_seconds, baseline, "estimated arrival bands");

        Ok(EtaEstimate {
            depart_time: origin_departure,
            p50_arrival,
            p80_arrival,
            p90_arrival,
            headway_seconds,
            explanation,
        })
    }
}

impl Default for EtaEstimator {
    fn default() -> Self {
        Self::new(&EstimateConfig::default())
    }
}

/// `p50` plus a buffer of `floor(factor * baseline * multiplier)` seconds.
fn widen(
    p50: DateTime<FixedOffset>,
    factor: f64,
    baseline_secs: i64,
    multiplier: f64,
) -> Result<DateTime<FixedOffset>, EstimateError> {
    let secs = (factor * baseline_secs as f64 * multiplier).floor();
    let out_of_range = || {
        EstimateError::Input(format!(
            "uncertainty band of {secs} seconds is out of range (alert multiplier {multiplier})"
        ))
    };

    // i64::MAX as f64 rounds up to 2^63, so the bound is exclusive.
    if !(secs > i64::MIN as f64 && secs < i64::MAX as f64) {
        return Err(out_of_range());
    }
    let buffer = TimeDelta::try_seconds(secs as i64).ok_or_else(out_of_range)?;
    p50.checked_add_signed(buffer).ok_or_else(out_of_range)
}

fn headway_explanation(headway_seconds: Option<i64>) -> &'static str {
    match headway_seconds {
        None => DEFAULT_HEADWAY_EXPLANATION,
        Some(h) if h >= INFREQUENT_HEADWAY_SECS => INFREQUENT_EXPLANATION,
        Some(h) if h >= FREQUENT_HEADWAY_SECS => FREQUENT_EXPLANATION,
        Some(_) => MODERATE_EXPLANATION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn t0() -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(2026, 1, 20, 12, 0, 0)
            .unwrap()
            .fixed_offset()
    }

    fn at(mins: i64) -> DateTime<FixedOffset> {
        t0() + Duration::minutes(mins)
    }

    #[test]
    fn default_headway_when_no_second_departure() {
        let eta = EtaEstimator::default()
            .estimate(t0(), at(5), at(25), None, 1.0)
            .unwrap();

        assert_eq!(eta.headway_seconds, None);
        assert_eq!(eta.depart_time, at(5));
        assert_eq!(eta.p50_arrival, at(25));
        assert_eq!(eta.p80_arrival - eta.p50_arrival, Duration::seconds(210));
        assert_eq!(eta.p90_arrival - eta.p50_arrival, Duration::seconds(360));
        assert_eq!(eta.explanation, DEFAULT_HEADWAY_EXPLANATION);
    }

    #[test]
    fn large_headway_widens_bands() {
        let eta = EtaEstimator::default()
            .estimate(t0(), at(5), at(25), Some(at(17)), 1.0)
            .unwrap();

        assert_eq!(eta.headway_seconds, Some(720));
        // 0.35 * 720 is just under 252 in floating point
        assert_eq!(eta.p80_arrival - eta.p50_arrival, Duration::seconds(251));
        assert_eq!(eta.p90_arrival - eta.p50_arrival, Duration::seconds(432));
        assert_eq!(eta.explanation, INFREQUENT_EXPLANATION);
    }

    #[test]
    fn explanation_buckets() {
        assert_eq!(headway_explanation(None), DEFAULT_HEADWAY_EXPLANATION);
        assert_eq!(headway_explanation(Some(720)), INFREQUENT_EXPLANATION);
        assert_eq!(headway_explanation(Some(3600)), INFREQUENT_EXPLANATION);
        assert_eq!(headway_explanation(Some(719)), FREQUENT_EXPLANATION);
        assert_eq!(headway_explanation(Some(360)), FREQUENT_EXPLANATION);
        assert_eq!(headway_explanation(Some(359)), MODERATE_EXPLANATION);
        assert_eq!(headway_explanation(Some(1)), MODERATE_EXPLANATION);
    }

    #[test]
    fn out_of_order_second_departure_is_no_headway() {
        let est = EtaEstimator::default();

        let same = est.estimate(t0(), at(5), at(25), Some(at(5)), 1.0).unwrap();
        assert_eq!(same.headway_seconds, None);

        let earlier = est.estimate(t0(), at(5), at(25), Some(at(2)), 1.0).unwrap();
        assert_eq!(earlier.headway_seconds, None);
        assert_eq!(earlier.explanation, DEFAULT_HEADWAY_EXPLANATION);
    }

    #[test]
    fn alert_multiplier_widens_and_explains() {
        let eta = EtaEstimator::default()
            .estimate(t0(), at(5), at(25), Some(at(15)), 1.5)
            .unwrap();

        assert_eq!(eta.headway_seconds, Some(600));
        assert_eq!(eta.p80_arrival - eta.p50_arrival, Duration::seconds(315));
        assert_eq!(eta.p90_arrival - eta.p50_arrival, Duration::seconds(540));

        // Sentences are separated by a single space.
        assert_eq!(
            eta.explanation,
            format!("{FREQUENT_EXPLANATION} {ALERT_EXPLANATION}")
        );
    }

    #[test]
    fn no_alert_sentence_at_multiplier_one() {
        let eta = EtaEstimator::default()
            .estimate(t0(), at(5), at(25), Some(at(15)), 1.0)
            .unwrap();
        assert!(!eta.explanation.contains(ALERT_EXPLANATION));
    }

    #[test]
    fn rejects_destination_before_origin() {
        let err = EtaEstimator::default()
            .estimate(t0(), at(25), at(5), None, 1.0)
            .unwrap_err();
        assert!(matches!(err, EstimateError::Input(_)));
    }

    #[test]
    fn accepts_destination_equal_to_origin() {
        let eta = EtaEstimator::default()
            .estimate(t0(), at(5), at(5), None, 1.0)
            .unwrap();
        assert_eq!(eta.p50_arrival, eta.depart_time);
    }

    #[test]
    fn rejects_negative_or_nan_alert_multiplier() {
        let est = EtaEstimator::default();
        for m in [-0.5, -1.0, f64::NEG_INFINITY, f64::NAN] {
            let err = est.estimate(t0(), at(5), at(25), None, m).unwrap_err();
            assert!(matches!(err, EstimateError::Input(_)), "multiplier {m}");
        }
    }

    #[test]
    fn multiplier_below_one_narrows_bands() {
        let est = EtaEstimator::default();

        let half = est.estimate(t0(), at(5), at(25), None, 0.5).unwrap();
        assert_eq!(half.p80_arrival - half.p50_arrival, Duration::seconds(105));
        assert_eq!(half.p90_arrival - half.p50_arrival, Duration::seconds(180));
        assert_eq!(half.explanation, DEFAULT_HEADWAY_EXPLANATION);

        let zero = est.estimate(t0(), at(5), at(25), None, 0.0).unwrap();
        assert_eq!(zero.p80_arrival, zero.p50_arrival);
        assert_eq!(zero.p90_arrival, zero.p50_arrival);
    }

    #[test]
    fn huge_alert_multiplier_is_input_error() {
        let est = EtaEstimator::default();
        for m in [1e12, 1e300, f64::INFINITY] {
            let err = est.estimate(t0(), at(5), at(25), None, m).unwrap_err();
            assert!(matches!(err, EstimateError::Input(_)), "multiplier {m}");
            assert!(err.to_string().contains("out of range"), "multiplier {m}");
        }
    }

    #[test]
    fn mixed_offsets_compare_as_instants() {
        let boston = FixedOffset::west_opt(5 * 3600).unwrap();
        let depart = at(5).with_timezone(&boston);
        let second = at(17);

        let eta = EtaEstimator::default()
            .estimate(t0(), depart, at(25), Some(second), 1.0)
            .unwrap();
        assert_eq!(eta.headway_seconds, Some(720));
    }

    #[test]
    fn custom_band_factors() {
        let config = EstimateConfig::default()
            .with_default_headway_secs(100)
            .with_band_factors(0.5, 1.0);
        let eta = EtaEstimator::new(&config)
            .estimate(t0(), at(5), at(25), None, 1.0)
            .unwrap();

        assert_eq!(eta.p80_arrival - eta.p50_arrival, Duration::seconds(50));
        assert_eq!(eta.p90_arrival - eta.p50_arrival, Duration::seconds(100));
    }

    #[test]
    fn serializes_iso_timestamps() {
        let eta = EtaEstimator::default()
            .estimate(t0(), at(5), at(25), None, 1.0)
            .unwrap();
        let json = serde_json::to_value(&eta).unwrap();

        assert_eq!(json["depart_time"], "2026-01-20T12:05:00+00:00");
        assert_eq!(json["p50_arrival"], "2026-01-20T12:25:00+00:00");
        assert_eq!(json["p90_arrival"], "2026-01-20T12:31:00+00:00");
        assert_eq!(json["headway_seconds"], serde_json::Value::Null);
    }
}
