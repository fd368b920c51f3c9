//! 產出彙總

use std::collections::BTreeMap;

use kpi_core::{KpiError, Result};
use serde::Serialize;

use crate::grouping::{self, Grouping};
use crate::metrics::EnrichedRecord;
use crate::stats;

/// 整體產出彙總
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThroughputSummary {
    /// 實際產量總和
    pub total_production: f64,

    /// 總可用時數
    pub total_available_hours: f64,

    /// 每可用小時平均產出（由總量回推）
    pub average_throughput_per_hour: Option<f64>,

    /// 每班平均產量
    pub average_production_per_shift: f64,

    /// 單班最高產量
    pub peak_shift_production: f64,

    /// 分析班次數
    pub total_shifts_analyzed: usize,
}

/// 單一分組的產出彙總
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThroughputGroupSummary {
    /// 實際產量總和
    pub total_production: f64,

    /// 每班平均產量
    pub avg_production_per_shift: f64,

    /// 可用分鐘總和
    pub total_available_minutes: f64,

    /// 每可用小時產出
    pub throughput_per_hour: Option<f64>,
}

/// 產出彙總結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ThroughputReport {
    /// 整體彙總
    Overall(ThroughputSummary),
    /// 依分組鍵的彙總
    Grouped(BTreeMap<String, ThroughputGroupSummary>),
}

/// 產出計算器
pub struct ThroughputCalculator;

impl ThroughputCalculator {
    /// 計算產出彙總
    pub fn calculate(records: &[&EnrichedRecord], grouping: Grouping) -> Result<ThroughputReport> {
        if records.is_empty() {
            return Err(KpiError::EmptyView);
        }

        match grouping {
            Grouping::Overall => Ok(ThroughputReport::Overall(Self::summarize(records))),
            Grouping::By(group_by) => {
                let groups = grouping::partition(records, group_by)
                    .into_iter()
                    .map(|(key, group)| (key, Self::summarize_group(&group)))
                    .collect();
                Ok(ThroughputReport::Grouped(groups))
            }
        }
    }

    pub(crate) fn summarize(records: &[&EnrichedRecord]) -> ThroughputSummary {
        let total_production: f64 = records.iter().map(|r| r.base.actual_production).sum();
        let total_available_minutes: f64 =
            records.iter().map(|r| r.metrics.available_minutes).sum();
        let total_available_hours = total_available_minutes / 60.0;
        let productions: Vec<f64> = records.iter().map(|r| r.base.actual_production).collect();

        ThroughputSummary {
            total_production,
            total_available_hours: stats::round1(total_available_hours),
            average_throughput_per_hour: stats::ratio_of_totals(
                total_production,
                total_available_hours,
            )
            .map(stats::round2),
            average_production_per_shift: stats::round2(stats::mean(&productions)),
            peak_shift_production: stats::max(&productions),
            total_shifts_analyzed: records.len(),
        }
    }

    fn summarize_group(records: &[&EnrichedRecord]) -> ThroughputGroupSummary {
        let total_production: f64 = records.iter().map(|r| r.base.actual_production).sum();
        let total_available_minutes: f64 =
            records.iter().map(|r| r.metrics.available_minutes).sum();
        let productions: Vec<f64> = records.iter().map(|r| r.base.actual_production).collect();

        ThroughputGroupSummary {
            total_production,
            avg_production_per_shift: stats::mean(&productions),
            total_available_minutes,
            throughput_per_hour: stats::ratio_of_totals(
                total_production,
                total_available_minutes / 60.0,
            )
            .map(stats::round2),
        }
    }
}
