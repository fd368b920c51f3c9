//! 停機分析

use std::collections::BTreeMap;

use kpi_core::{KpiError, Result};
use serde::Serialize;

use crate::grouping::{self, Grouping};
use crate::metrics::EnrichedRecord;
use crate::stats;

/// 高停機門檻（分鐘）
const HIGH_DOWNTIME_MINUTES: f64 = 60.0;

/// 整體停機彙總
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DowntimeSummary {
    /// 總停機時數
    pub total_downtime_hours: f64,

    /// 每班平均停機分鐘
    pub average_downtime_per_shift_minutes: f64,

    /// 單班最長停機分鐘
    pub worst_downtime_shift_minutes: f64,

    /// 停機超過一小時的班次數
    pub shifts_with_high_downtime: usize,

    /// 零停機班次數
    pub shifts_with_zero_downtime: usize,

    /// 逐列稼動率的平均
    pub overall_availability: f64,

    /// 分析班次數
    pub total_shifts_analyzed: usize,
}

/// 單一分組的停機彙總
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DowntimeGroupSummary {
    /// 停機分鐘總和
    pub total_downtime_min: f64,

    /// 每班平均停機分鐘
    pub avg_downtime_min: f64,

    /// 單班最長停機分鐘
    pub max_downtime_min: f64,

    /// 逐列稼動率的平均
    pub avg_availability: f64,

    /// 總停機時數
    pub total_downtime_hours: f64,
}

/// 停機彙總結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DowntimeReport {
    /// 整體彙總
    Overall(DowntimeSummary),
    /// 依分組鍵的彙總
    Grouped(BTreeMap<String, DowntimeGroupSummary>),
}

/// 停機計算器
pub struct DowntimeCalculator;

impl DowntimeCalculator {
    /// 計算停機彙總
    pub fn calculate(records: &[&EnrichedRecord], grouping: Grouping) -> Result<DowntimeReport> {
        if records.is_empty() {
            return Err(KpiError::EmptyView);
        }

        match grouping {
            Grouping::Overall => Ok(DowntimeReport::Overall(Self::summarize(records))),
            Grouping::By(group_by) => {
                let groups = grouping::partition(records, group_by)
                    .into_iter()
                    .map(|(key, group)| (key, Self::summarize_group(&group)))
                    .collect();
                Ok(DowntimeReport::Grouped(groups))
            }
        }
    }

    pub(crate) fn summarize(records: &[&EnrichedRecord]) -> DowntimeSummary {
        let downtimes: Vec<f64> = records.iter().map(|r| r.base.downtime_minutes).collect();
        let availabilities: Vec<f64> = records.iter().map(|r| r.metrics.availability).collect();
        let total_downtime: f64 = downtimes.iter().sum();

        DowntimeSummary {
            total_downtime_hours: stats::round1(total_downtime / 60.0),
            average_downtime_per_shift_minutes: stats::round1(stats::mean(&downtimes)),
            worst_downtime_shift_minutes: stats::max(&downtimes),
            shifts_with_high_downtime: downtimes
                .iter()
                .filter(|&&minutes| minutes > HIGH_DOWNTIME_MINUTES)
                .count(),
            shifts_with_zero_downtime: downtimes
                .iter()
                .filter(|&&minutes| minutes == 0.0)
                .count(),
            overall_availability: stats::round2(stats::mean(&availabilities)),
            total_shifts_analyzed: records.len(),
        }
    }

    fn summarize_group(records: &[&EnrichedRecord]) -> DowntimeGroupSummary {
        let downtimes: Vec<f64> = records.iter().map(|r| r.base.downtime_minutes).collect();
        let availabilities: Vec<f64> = records.iter().map(|r| r.metrics.availability).collect();
        let total_downtime: f64 = downtimes.iter().sum();

        DowntimeGroupSummary {
            total_downtime_min: stats::round2(total_downtime),
            avg_downtime_min: stats::round2(stats::mean(&downtimes)),
            max_downtime_min: stats::max(&downtimes),
            avg_availability: stats::round2(stats::mean(&availabilities)),
            total_downtime_hours: stats::round1(total_downtime / 60.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kpi_core::{Shift, ShiftRecord};

    fn record(machine: &str, shift: Shift, downtime: f64) -> ShiftRecord {
        ShiftRecord::new(
            NaiveDate::from_ymd_opt(2026, 7, 6)
                .unwrap()
                .and_hms_opt(shift.start_hour(), 0, 0)
                .unwrap(),
            machine.to_string(),
            "OP001".to_string(),
            shift,
            800.0,
            700.0,
        )
        .with_downtime(downtime)
    }

    fn view(records: &[EnrichedRecord]) -> Vec<&EnrichedRecord> {
        records.iter().collect()
    }

    #[test]
    fn test_overall_downtime_summary() {
        let enriched = crate::metrics::enrich(vec![
            record("M1", Shift::Morning, 0.0),
            record("M1", Shift::Afternoon, 90.0),
            record("M2", Shift::Night, 30.0),
        ]);

        let report = DowntimeCalculator::calculate(&view(&enriched), Grouping::Overall).unwrap();

        let DowntimeReport::Overall(summary) = report else {
            panic!("預期整體彙總");
        };
        assert_eq!(summary.total_downtime_hours, 2.0);
        assert_eq!(summary.average_downtime_per_shift_minutes, 40.0);
        assert_eq!(summary.worst_downtime_shift_minutes, 90.0);
        assert_eq!(summary.shifts_with_high_downtime, 1);
        assert_eq!(summary.shifts_with_zero_downtime, 1);
        assert_eq!(summary.total_shifts_analyzed, 3);
    }

    #[test]
    fn test_high_downtime_threshold_is_strict() {
        // 恰好 60 分鐘不算高停機
        let enriched = crate::metrics::enrich(vec![record("M1", Shift::Morning, 60.0)]);

        let report = DowntimeCalculator::calculate(&view(&enriched), Grouping::Overall).unwrap();

        let DowntimeReport::Overall(summary) = report else {
            panic!("預期整體彙總");
        };
        assert_eq!(summary.shifts_with_high_downtime, 0);
    }

    #[test]
    fn test_grouped_by_shift() {
        let enriched = crate::metrics::enrich(vec![
            record("M1", Shift::Morning, 20.0),
            record("M2", Shift::Morning, 40.0),
            record("M1", Shift::Night, 120.0),
        ]);

        let report = DowntimeCalculator::calculate(
            &view(&enriched),
            Grouping::By(crate::GroupBy::Shift),
        )
        .unwrap();

        let DowntimeReport::Grouped(groups) = report else {
            panic!("預期分組彙總");
        };
        assert_eq!(groups["Morning"].total_downtime_min, 60.0);
        assert_eq!(groups["Morning"].avg_downtime_min, 30.0);
        assert_eq!(groups["Night"].max_downtime_min, 120.0);
        assert_eq!(groups["Night"].total_downtime_hours, 2.0);
    }

    #[test]
    fn test_empty_view_is_rejected() {
        assert!(matches!(
            DowntimeCalculator::calculate(&[], Grouping::Overall).unwrap_err(),
            KpiError::EmptyView
        ));
    }
}
