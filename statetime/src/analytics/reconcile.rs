use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use statetime_core::model::RegionCode;

use crate::attribution::AttributionRecord;

/// one (trip, region) pair joined across the two strategies. a pair seen by
/// only one strategy still appears, with zero seconds on the other side.
/// `difference_sec` is precise minus lazy. `pct_diff` is None when the
/// precise side is zero, never a division by zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconciliationRow {
    pub vehicle_id: String,
    pub trip_id: String,
    pub region: RegionCode,
    pub drive_seconds_lazy: i64,
    pub drive_seconds_precise: i64,
    pub difference_sec: i64,
    pub pct_diff: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconciliationSummary {
    pub rows: usize,
    pub max_abs_diff_sec: i64,
    pub mean_abs_diff_sec: f64,
    pub max_abs_pct_diff: Option<f64>,
    pub mean_abs_pct_diff: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ReconciliationReport {
    pub rows: Vec<ReconciliationRow>,
    pub summary: ReconciliationSummary,
}

/// full outer join of the two strategies' row sets on (vehicle, trip,
/// region), with per-row deltas and fleet-level aggregates.
pub fn reconcile(lazy: &[AttributionRecord], precise: &[AttributionRecord]) -> ReconciliationReport {
    type Key = (String, String, RegionCode);
    let mut joined: HashMap<Key, (i64, i64)> = HashMap::new();
    for row in lazy.iter() {
        let key = (row.vehicle_id.clone(), row.trip_id.clone(), row.region.clone());
        joined.entry(key).or_insert((0, 0)).0 += row.drive_seconds;
    }
    for row in precise.iter() {
        let key = (row.vehicle_id.clone(), row.trip_id.clone(), row.region.clone());
        joined.entry(key).or_insert((0, 0)).1 += row.drive_seconds;
    }

    let mut rows: Vec<ReconciliationRow> = joined
        .into_iter()
        .map(|((vehicle_id, trip_id, region), (lazy_sec, precise_sec))| {
            let difference = precise_sec - lazy_sec;
            let pct_diff = if precise_sec > 0 {
                Some(difference as f64 / precise_sec as f64 * 100.0)
            } else {
                None
            };
            ReconciliationRow {
                vehicle_id,
                trip_id,
                region,
                drive_seconds_lazy: lazy_sec,
                drive_seconds_precise: precise_sec,
                difference_sec: difference,
                pct_diff,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        a.vehicle_id
            .cmp(&b.vehicle_id)
            .then_with(|| a.trip_id.cmp(&b.trip_id))
            .then_with(|| a.region.cmp(&b.region))
    });

    let summary = summarize(&rows);
    ReconciliationReport { rows, summary }
}

fn summarize(rows: &[ReconciliationRow]) -> ReconciliationSummary {
    let abs_diffs: Vec<i64> = rows.iter().map(|r| r.difference_sec.abs()).collect();
    let abs_pcts: Vec<f64> = rows.iter().filter_map(|r| r.pct_diff.map(f64::abs)).collect();
    ReconciliationSummary {
        rows: rows.len(),
        max_abs_diff_sec: abs_diffs.iter().copied().max().unwrap_or(0),
        mean_abs_diff_sec: if abs_diffs.is_empty() {
            0.0
        } else {
            abs_diffs.iter().sum::<i64>() as f64 / abs_diffs.len() as f64
        },
        max_abs_pct_diff: abs_pcts.iter().copied().fold(None, |acc, p| {
            Some(acc.map_or(p, |a: f64| a.max(p)))
        }),
        mean_abs_pct_diff: if abs_pcts.is_empty() {
            None
        } else {
            Some(abs_pcts.iter().sum::<f64>() / abs_pcts.len() as f64)
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(trip: &str, region: &str, seconds: i64) -> AttributionRecord {
        AttributionRecord {
            vehicle_id: "veh".to_string(),
            trip_id: trip.to_string(),
            region: RegionCode::from(region),
            drive_seconds: seconds,
            leg_seconds_total: 0,
        }
    }

    #[test]
    fn test_outer_join_keeps_one_sided_pairs() {
        let lazy = vec![record("t1", "US:Kansas", 600), record("t1", "US:Missouri", 120)];
        let precise = vec![record("t1", "US:Kansas", 540)];
        let report = reconcile(&lazy, &precise);

        assert_eq!(report.rows.len(), 2);
        let kansas = &report.rows[0];
        assert_eq!(kansas.region.as_str(), "US:Kansas");
        assert_eq!(kansas.difference_sec, -60);
        assert!((kansas.pct_diff.unwrap() - (-60.0 / 540.0 * 100.0)).abs() < 1e-12);

        let missouri = &report.rows[1];
        assert_eq!(missouri.drive_seconds_precise, 0);
        assert_eq!(missouri.difference_sec, -120);
        assert_eq!(missouri.pct_diff, None);
    }

    #[test]
    fn test_summary_ignores_null_percentages() {
        let lazy = vec![record("t1", "US:Kansas", 600), record("t1", "US:Missouri", 120)];
        let precise = vec![record("t1", "US:Kansas", 600)];
        let report = reconcile(&lazy, &precise);

        assert_eq!(report.summary.rows, 2);
        assert_eq!(report.summary.max_abs_diff_sec, 120);
        assert!((report.summary.mean_abs_diff_sec - 60.0).abs() < 1e-12);
        // only the Kansas row carries a percentage, and it is zero
        assert_eq!(report.summary.max_abs_pct_diff, Some(0.0));
        assert_eq!(report.summary.mean_abs_pct_diff, Some(0.0));
    }

    #[test]
    fn test_empty_inputs() {
        let report = reconcile(&[], &[]);
        assert!(report.rows.is_empty());
        assert_eq!(report.summary.max_abs_diff_sec, 0);
        assert_eq!(report.summary.max_abs_pct_diff, None);
        assert_eq!(report.summary.mean_abs_pct_diff, None);
    }

    #[test]
    fn test_agreement_yields_zero_deltas() {
        let rows = vec![record("t1", "US:Texas", 3600)];
        let report = reconcile(&rows, &rows);
        assert_eq!(report.rows[0].difference_sec, 0);
        assert_eq!(report.rows[0].pct_diff, Some(0.0));
    }
}
