//! Timing — elapsed and accumulated seconds between consecutive records.

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use super::model::{ErpRecord, WebRecord};

/// Records that carry the instant they were logged at.
pub trait Timed {
    fn instant(&self) -> NaiveDateTime;
}

impl Timed for ErpRecord {
    fn instant(&self) -> NaiveDateTime {
        self.instant
    }
}

/// Web logs only carry a time of day; the instant sits on a fixed reference day,
/// so a log crossing midnight produces a negative delta.
impl Timed for WebRecord {
    fn instant(&self) -> NaiveDateTime {
        self.instant
    }
}

/// A record with its timing metrics attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enriched<R> {
    #[serde(flatten)]
    pub record: R,
    /// Seconds since the previous record, 0 for the first
    pub elapsed_seconds: f64,
    /// Seconds since the first record, 0 for the first
    pub accumulated_seconds: f64,
}

impl<R> Enriched<R> {
    pub fn into_record(self) -> R {
        self.record
    }
}

/// Attach elapsed/accumulated seconds to every record, in order.
///
/// Timestamps are not checked for monotonicity: out-of-order records get
/// negative values.
pub fn augment_with_timing<R, F>(records: Vec<R>, instant_of: F) -> Vec<Enriched<R>>
where
    F: Fn(&R) -> NaiveDateTime,
{
    let instants: Vec<NaiveDateTime> = records.iter().map(&instant_of).collect();
    let Some(&first) = instants.first() else {
        return Vec::new();
    };

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let (elapsed, accumulated) = if i == 0 {
                (0.0, 0.0)
            } else {
                (
                    seconds(instants[i] - instants[i - 1]),
                    seconds(instants[i] - first),
                )
            };
            Enriched {
                record,
                elapsed_seconds: elapsed,
                accumulated_seconds: accumulated,
            }
        })
        .collect()
}

/// [`augment_with_timing`] using each record's own instant.
pub fn augment<R: Timed>(records: Vec<R>) -> Vec<Enriched<R>> {
    augment_with_timing(records, Timed::instant)
}

fn seconds(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::builder::{parse_erp_log, parse_web_log};
    use crate::parser::formats::EVENT_SENTINEL;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .unwrap()
    }

    #[test]
    fn test_erp_scenario_timing() {
        let records = parse_erp_log([
            "2024-01-01 10:00:00:INFO:started",
            "more text",
            "2024-01-01 10:00:05:INFO:finished",
        ])
        .unwrap();
        let enriched = augment(records);
        assert_eq!(enriched[0].elapsed_seconds, 0.0);
        assert_eq!(enriched[0].accumulated_seconds, 0.0);
        assert_eq!(enriched[1].elapsed_seconds, 5.0);
        assert_eq!(enriched[1].accumulated_seconds, 5.0);
    }

    #[test]
    fn test_web_scenario_timing() {
        let records = parse_web_log([
            EVENT_SENTINEL,
            "10:00:00 ** LOGIN ** user x logged in",
            EVENT_SENTINEL,
            "10:00:02 ** LOGOUT ** user x logged out",
        ])
        .unwrap();
        let enriched = augment(records);
        assert_eq!(enriched[1].elapsed_seconds, 2.0);
        assert_eq!(enriched[1].accumulated_seconds, 2.0);
    }

    #[test]
    fn test_erp_timing_spans_days() {
        let records = parse_erp_log([
            "2024-01-01 23:59:59:INFO:a",
            "2024-01-02 00:00:01:INFO:b",
        ])
        .unwrap();
        let enriched = augment(records);
        assert_eq!(enriched[1].elapsed_seconds, 2.0);
    }

    #[test]
    fn test_web_midnight_rollover_is_negative() {
        let records = parse_web_log([
            EVENT_SENTINEL,
            "23:59:59 ** A ** x",
            EVENT_SENTINEL,
            "00:00:01 ** B ** y",
        ])
        .unwrap();
        let enriched = augment(records);
        assert_eq!(enriched[1].elapsed_seconds, -86398.0);
    }

    #[test]
    fn test_empty_and_single() {
        let empty: Vec<NaiveDateTime> = Vec::new();
        assert!(augment_with_timing(empty, |t| *t).is_empty());

        let single = augment_with_timing(vec![at(10, 0, 0)], |t| *t);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].elapsed_seconds, 0.0);
        assert_eq!(single[0].accumulated_seconds, 0.0);
    }

    #[test]
    fn test_out_of_order_is_negative() {
        let enriched = augment_with_timing(vec![at(10, 0, 10), at(10, 0, 4), at(10, 0, 7)], |t| *t);
        let elapsed: Vec<f64> = enriched.iter().map(|e| e.elapsed_seconds).collect();
        let accumulated: Vec<f64> = enriched.iter().map(|e| e.accumulated_seconds).collect();
        assert_eq!(elapsed, vec![0.0, -6.0, 3.0]);
        assert_eq!(accumulated, vec![0.0, -6.0, -3.0]);
    }

    #[test]
    fn test_accumulated_is_sum_of_elapsed() {
        let instants = vec![at(9, 0, 0), at(9, 0, 3), at(9, 1, 0), at(9, 0, 30), at(11, 15, 42)];
        let enriched = augment_with_timing(instants, |t| *t);
        let mut running = 0.0;
        for e in &enriched {
            running += e.elapsed_seconds;
            assert_eq!(e.accumulated_seconds, running);
        }
    }

    #[test]
    fn test_augment_is_idempotent() {
        let instants = vec![at(8, 0, 0), at(8, 30, 0), at(8, 29, 59)];
        let first = augment_with_timing(instants, |t| *t);
        let metrics: Vec<(f64, f64)> = first
            .iter()
            .map(|e| (e.elapsed_seconds, e.accumulated_seconds))
            .collect();

        let base: Vec<NaiveDateTime> = first.into_iter().map(Enriched::into_record).collect();
        let second = augment_with_timing(base, |t| *t);
        let again: Vec<(f64, f64)> = second
            .iter()
            .map(|e| (e.elapsed_seconds, e.accumulated_seconds))
            .collect();
        assert_eq!(metrics, again);
    }

    #[test]
    fn test_enriched_serializes_flat() {
        let records = parse_erp_log(["2024-01-01 10:00:00:INFO:started"]).unwrap();
        let enriched = augment(records);
        let json = serde_json::to_value(&enriched[0]).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["category"], "INFO");
        assert_eq!(json["message"], "started");
        assert_eq!(json["elapsed_seconds"], 0.0);
        assert!(json.get("instant").is_none());
    }
}
