//! OEE 彙總
//!
//! OEE = 稼動率 × 表現率 × 良率。整體稼動率由總可用時間回推，
//! 不取逐列稼動率的平均。

use std::collections::BTreeMap;

use kpi_core::{KpiError, Result, SHIFT_MINUTES};
use serde::Serialize;

use crate::grouping::{self, Grouping};
use crate::metrics::EnrichedRecord;
use crate::stats;

/// 整體 OEE 彙總
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OeeSummary {
    /// 稼動率 = 總可用時間 / 總排程時間 × 100
    pub availability: f64,

    /// 逐列表現率的平均
    pub performance: f64,

    /// 逐列良率的平均
    pub quality_rate: f64,

    /// OEE = 稼動率 × 表現率 × 良率 / 10000
    pub oee: f64,

    /// 實際產量總和
    pub total_production: f64,

    /// 總停機時數
    pub total_downtime_hours: f64,

    /// 分析班次數
    pub total_shifts_analyzed: usize,

    /// 資料跨越天數（首尾時間戳，含兩端）
    pub utilization_days: i64,
}

/// 單一分組的 OEE 彙總
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OeeGroupSummary {
    /// 逐列稼動率的平均
    pub availability: f64,

    /// 逐列表現率的平均
    pub performance: f64,

    /// 逐列良率的平均
    pub quality_rate: f64,

    /// 逐列 OEE 的平均
    pub oee: f64,

    /// 實際產量總和
    pub actual_production: f64,

    /// 停機分鐘總和
    pub downtime_minutes: f64,

    /// 總停機時數
    pub total_downtime_hours: f64,
}

/// OEE 彙總結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OeeReport {
    /// 整體彙總
    Overall(OeeSummary),
    /// 依分組鍵的彙總
    Grouped(BTreeMap<String, OeeGroupSummary>),
}

/// OEE 計算器
pub struct OeeCalculator;

impl OeeCalculator {
    /// 計算 OEE 彙總
    pub fn calculate(records: &[&EnrichedRecord], grouping: Grouping) -> Result<OeeReport> {
        if records.is_empty() {
            return Err(KpiError::EmptyView);
        }

        match grouping {
            Grouping::Overall => Ok(OeeReport::Overall(Self::summarize(records))),
            Grouping::By(group_by) => {
                let groups = grouping::partition(records, group_by)
                    .into_iter()
                    .map(|(key, group)| (key, Self::summarize_group(&group)))
                    .collect();
                Ok(OeeReport::Grouped(groups))
            }
        }
    }

    pub(crate) fn summarize(records: &[&EnrichedRecord]) -> OeeSummary {
        let total_shifts = records.len();
        let total_possible_minutes = total_shifts as f64 * SHIFT_MINUTES;
        let total_downtime: f64 = records.iter().map(|r| r.base.downtime_minutes).sum();
        let total_available_minutes = total_possible_minutes - total_downtime;

        // 稼動率由總量回推；班次數至少為 1，分母必為正
        let availability = total_available_minutes / total_possible_minutes * 100.0;
        let performance =
            stats::mean(&records.iter().map(|r| r.metrics.performance).collect::<Vec<_>>());
        let quality_rate =
            stats::mean(&records.iter().map(|r| r.metrics.quality_rate).collect::<Vec<_>>());
        let oee = availability * performance * quality_rate / 10_000.0;

        let first_timestamp = records.iter().map(|r| r.base.timestamp).min();
        let last_timestamp = records.iter().map(|r| r.base.timestamp).max();
        let utilization_days = match (first_timestamp, last_timestamp) {
            (Some(first), Some(last)) => (last - first).num_days() + 1,
            _ => 0,
        };

        OeeSummary {
            availability: stats::round2(availability),
            performance: stats::round2(performance),
            quality_rate: stats::round2(quality_rate),
            oee: stats::round2(oee),
            total_production: records.iter().map(|r| r.base.actual_production).sum(),
            total_downtime_hours: stats::round1(total_downtime / 60.0),
            total_shifts_analyzed: total_shifts,
            utilization_days,
        }
    }

    fn summarize_group(records: &[&EnrichedRecord]) -> OeeGroupSummary {
        let availabilities: Vec<f64> = records.iter().map(|r| r.metrics.availability).collect();
        let performances: Vec<f64> = records.iter().map(|r| r.metrics.performance).collect();
        let quality_rates: Vec<f64> = records.iter().map(|r| r.metrics.quality_rate).collect();
        let oees: Vec<f64> = records.iter().map(|r| r.metrics.oee).collect();
        let downtime: f64 = records.iter().map(|r| r.base.downtime_minutes).sum();

        OeeGroupSummary {
            availability: stats::round2(stats::mean(&availabilities)),
            performance: stats::round2(stats::mean(&performances)),
            quality_rate: stats::round2(stats::mean(&quality_rates)),
            oee: stats::round2(stats::mean(&oees)),
            actual_production: records.iter().map(|r| r.base.actual_production).sum(),
            downtime_minutes: downtime,
            total_downtime_hours: stats::round1(downtime / 60.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kpi_core::{Shift, ShiftRecord};

    fn record(day: u32, machine: &str, target: f64, actual: f64, downtime: f64) -> ShiftRecord {
        ShiftRecord::new(
            NaiveDate::from_ymd_opt(2026, 7, day)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap(),
            machine.to_string(),
            "OP001".to_string(),
            Shift::Morning,
            target,
            actual,
        )
        .with_downtime(downtime)
    }

    fn view(records: &[EnrichedRecord]) -> Vec<&EnrichedRecord> {
        records.iter().collect()
    }

    #[test]
    fn test_overall_availability_comes_from_time_totals() {
        // 兩班共 960 分鐘、停機 240 分鐘 → 稼動率 75%
        let enriched = crate::metrics::enrich(vec![
            record(1, "M1", 100.0, 90.0, 0.0),
            record(2, "M1", 100.0, 40.0, 240.0),
        ]);

        let report = OeeCalculator::calculate(&view(&enriched), Grouping::Overall).unwrap();

        let OeeReport::Overall(summary) = report else {
            panic!("預期整體彙總");
        };
        assert_eq!(summary.availability, 75.0);
        assert_eq!(summary.total_production, 130.0);
        assert_eq!(summary.total_downtime_hours, 4.0);
        assert_eq!(summary.total_shifts_analyzed, 2);
        assert_eq!(summary.utilization_days, 2);
    }

    #[test]
    fn test_two_machine_scenario() {
        // M1 整班正常：availability 100、performance 90、oee 90
        // M2 整班停機：availability 0、performance 0、oee 0
        let enriched = crate::metrics::enrich(vec![
            record(1, "M1", 100.0, 90.0, 0.0),
            record(1, "M2", 50.0, 50.0, 480.0),
        ]);

        assert_eq!(enriched[0].metrics.availability, 100.0);
        assert!(enriched[0].metrics.oee > 0.0);
        assert_eq!(enriched[1].metrics.availability, 0.0);
        assert_eq!(enriched[1].metrics.performance, 0.0);
        assert_eq!(enriched[1].metrics.oee, 0.0);

        let report = OeeCalculator::calculate(
            &view(&enriched),
            Grouping::By(crate::GroupBy::MachineId),
        )
        .unwrap();

        let OeeReport::Grouped(groups) = report else {
            panic!("預期分組彙總");
        };
        assert_eq!(groups["M1"].oee, 90.0);
        assert_eq!(groups["M2"].oee, 0.0);
        assert_eq!(groups["M2"].total_downtime_hours, 8.0);
    }

    #[test]
    fn test_utilization_days_spans_timestamps() {
        let enriched = crate::metrics::enrich(vec![
            record(1, "M1", 100.0, 90.0, 0.0),
            record(15, "M1", 100.0, 90.0, 0.0),
        ]);

        let report = OeeCalculator::calculate(&view(&enriched), Grouping::Overall).unwrap();

        let OeeReport::Overall(summary) = report else {
            panic!("預期整體彙總");
        };
        assert_eq!(summary.utilization_days, 15);
    }

    #[test]
    fn test_empty_view_is_rejected() {
        assert!(matches!(
            OeeCalculator::calculate(&[], Grouping::Overall).unwrap_err(),
            KpiError::EmptyView
        ));
    }
}
