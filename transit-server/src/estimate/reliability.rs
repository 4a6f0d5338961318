//! Reliability score for a journey estimate.
//!
//! Starts from 100 and subtracts fixed penalties for weak signals. Each
//! penalty contributes a short reason so the score can be explained.

use serde::Serialize;

const MAX_SCORE: i32 = 100;

const UNKNOWN_HEADWAY_PENALTY: i32 = 25;
const INFREQUENT_PENALTY: i32 = 45;
const LARGE_HEADWAY_PENALTY: i32 = 30;
const MODERATE_HEADWAY_PENALTY: i32 = 15;
const DEFAULT_HEADWAY_PENALTY: i32 = 10;
const NO_DESTINATION_MATCH_PENALTY: i32 = 40;

/// Reliability score with human-readable reasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReliabilityReport {
    /// Score from 0 (unreliable) to 100.
    pub score: u8,

    /// Reasons in the order penalties were applied. Never empty.
    pub reasons: Vec<String>,
}

/// Scores journey estimates from headway and data-coverage signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReliabilityScorer;

impl ReliabilityScorer {
    /// Create a scorer.
    pub fn new() -> Self {
        Self
    }

    /// Score an estimate.
    ///
    /// Exactly one headway penalty applies; the default-headway and
    /// destination-coverage penalties stack on top.
    pub fn score(
        &self,
        headway_seconds: Option<i64>,
        used_default_headway: bool,
        had_destination_match: bool,
    ) -> ReliabilityReport {
        let mut penalty = 0;
        let mut reasons = Vec::new();

        let (headway_penalty, reason) = match headway_seconds {
            None => (
                UNKNOWN_HEADWAY_PENALTY,
                "Headway could not be estimated from live data.",
            ),
            Some(h) if h >= 15 * 60 => (
                INFREQUENT_PENALTY,
                "Service is infrequent right now (large headway).",
            ),
            Some(h) if h >= 10 * 60 => (
                LARGE_HEADWAY_PENALTY,
                "Service headway is moderately large right now.",
            ),
            Some(h) if h >= 6 * 60 => (
                MODERATE_HEADWAY_PENALTY,
                "Service headway is moderate right now.",
            ),
            Some(_) => (0, "Service is frequent right now (small headway)."),
        };
        penalty += headway_penalty;
        reasons.push(reason.to_string());

        if used_default_headway {
            penalty += DEFAULT_HEADWAY_PENALTY;
            reasons.push("Uncertainty bands used a conservative default headway.".to_string());
        }

        // Unreachable from the journey estimator today, which fails before
        // scoring when nothing matches.
        if !had_destination_match {
            penalty += NO_DESTINATION_MATCH_PENALTY;
            reasons.push("Destination prediction coverage was missing for upcoming trips.".to_string());
        }

        if reasons.is_empty() {
            reasons.push("Reliability could not be assessed with available signals.".to_string());
        }

        let score = (MAX_SCORE - penalty).clamp(0, MAX_SCORE) as u8;

        ReliabilityReport { score, reasons }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(headway: Option<i64>, used_default: bool, matched: bool) -> ReliabilityReport {
        ReliabilityScorer::new().score(headway, used_default, matched)
    }

    #[test]
    fn frequent_service_scores_full() {
        let report = score(Some(300), false, true);
        assert_eq!(report.score, 100);
        assert_eq!(report.reasons.len(), 1);
        assert!(report.reasons[0].contains("frequent"));
    }

    #[test]
    fn headway_buckets() {
        assert_eq!(score(Some(359), false, true).score, 100);
        assert_eq!(score(Some(360), false, true).score, 85);
        assert_eq!(score(Some(599), false, true).score, 85);
        assert_eq!(score(Some(600), false, true).score, 70);
        assert_eq!(score(Some(720), false, true).score, 70);
        assert_eq!(score(Some(899), false, true).score, 70);
        assert_eq!(score(Some(900), false, true).score, 55);
        assert_eq!(score(Some(3600), false, true).score, 55);
    }

    #[test]
    fn unknown_headway_with_default() {
        let report = score(None, true, true);
        assert_eq!(report.score, 65);
        assert_eq!(
            report.reasons,
            [
                "Headway could not be estimated from live data.",
                "Uncertainty bands used a conservative default headway.",
            ]
        );
    }

    #[test]
    fn missing_destination_match_penalty() {
        let report = score(Some(300), false, false);
        assert_eq!(report.score, 60);
        assert_eq!(report.reasons.len(), 2);
        assert!(report.reasons[1].contains("Destination prediction coverage"));
    }

    #[test]
    fn all_penalties_stack() {
        // 100 - 25 - 10 - 40
        let report = score(None, true, false);
        assert_eq!(report.score, 25);
        assert_eq!(report.reasons.len(), 3);
    }

    #[test]
    fn serializes() {
        let json = serde_json::to_value(score(Some(900), false, true)).unwrap();
        assert_eq!(json["score"], 55);
        assert!(json["reasons"].is_array());
    }
}
