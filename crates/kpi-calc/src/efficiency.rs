//! 效率彙總

use std::collections::BTreeMap;

use kpi_core::{KpiError, Result};
use serde::Serialize;

use crate::grouping::{self, Grouping};
use crate::metrics::EnrichedRecord;
use crate::stats;

/// 整體效率彙總
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencySummary {
    /// 實際產量總和
    pub total_actual_production: f64,

    /// 目標產量總和
    pub total_target_production: f64,

    /// 由總量回推的整體效率（非逐列效率的平均，避免組距偏差）
    pub overall_efficiency: Option<f64>,

    /// 逐列效率的平均
    pub average_efficiency_per_shift: f64,

    /// 分析班次數
    pub total_shifts_analyzed: usize,
}

/// 單一分組的效率彙總
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyGroupSummary {
    /// 實際產量總和
    pub actual_production: f64,

    /// 目標產量總和
    pub target_production: f64,

    /// 逐列效率的平均
    pub efficiency: f64,

    /// 由組內總量回推的效率
    pub calculated_efficiency: Option<f64>,
}

/// 效率彙總結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EfficiencyReport {
    /// 整體彙總
    Overall(EfficiencySummary),
    /// 依分組鍵的彙總
    Grouped(BTreeMap<String, EfficiencyGroupSummary>),
}

/// 效率計算器
pub struct EfficiencyCalculator;

impl EfficiencyCalculator {
    /// 計算效率彙總
    pub fn calculate(records: &[&EnrichedRecord], grouping: Grouping) -> Result<EfficiencyReport> {
        if records.is_empty() {
            return Err(KpiError::EmptyView);
        }

        match grouping {
            Grouping::Overall => Ok(EfficiencyReport::Overall(Self::summarize(records))),
            Grouping::By(group_by) => {
                let groups = grouping::partition(records, group_by)
                    .into_iter()
                    .map(|(key, group)| (key, Self::summarize_group(&group)))
                    .collect();
                Ok(EfficiencyReport::Grouped(groups))
            }
        }
    }

    pub(crate) fn summarize(records: &[&EnrichedRecord]) -> EfficiencySummary {
        let total_actual: f64 = records.iter().map(|r| r.base.actual_production).sum();
        let total_target: f64 = records.iter().map(|r| r.base.target_production).sum();
        let efficiencies: Vec<f64> = records.iter().map(|r| r.metrics.efficiency).collect();

        EfficiencySummary {
            total_actual_production: total_actual,
            total_target_production: total_target,
            overall_efficiency: stats::pct_of_totals(total_actual, total_target)
                .map(stats::round2),
            average_efficiency_per_shift: stats::round2(stats::mean(&efficiencies)),
            total_shifts_analyzed: records.len(),
        }
    }

    fn summarize_group(records: &[&EnrichedRecord]) -> EfficiencyGroupSummary {
        let actual: f64 = records.iter().map(|r| r.base.actual_production).sum();
        let target: f64 = records.iter().map(|r| r.base.target_production).sum();
        let efficiencies: Vec<f64> = records.iter().map(|r| r.metrics.efficiency).collect();

        EfficiencyGroupSummary {
            actual_production: stats::round2(actual),
            target_production: stats::round2(target),
            efficiency: stats::round2(stats::mean(&efficiencies)),
            calculated_efficiency: stats::pct_of_totals(actual, target).map(stats::round2),
        }
    }
}
