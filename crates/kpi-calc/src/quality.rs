//! 品質彙總

use std::collections::BTreeMap;

use kpi_core::{KpiError, Result};
use serde::Serialize;

use crate::grouping::{self, Grouping};
use crate::metrics::EnrichedRecord;
use crate::stats;

/// 整體品質彙總
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualitySummary {
    /// 不良品總數
    pub total_defects: f64,

    /// 實際產量總和
    pub total_production: f64,

    /// 整體不良率 = 不良品總數 / 實際產量總和 × 100（取 3 位小數）
    pub overall_defect_rate: Option<f64>,

    /// 逐列良率的平均
    pub average_quality_rate: f64,

    /// 單班最佳良率
    pub best_quality_shift: f64,

    /// 單班最差良率
    pub worst_quality_shift: f64,

    /// 良率樣本標準差（品質穩定度）
    pub quality_consistency_std: f64,

    /// 分析班次數
    pub total_shifts_analyzed: usize,
}

/// 單一分組的品質彙總
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityGroupSummary {
    /// 不良品總數
    pub quality_defects: f64,

    /// 實際產量總和
    pub actual_production: f64,

    /// 逐列良率的平均
    pub quality_rate: f64,

    /// 組內不良率（取 3 位小數）
    pub defect_rate: Option<f64>,
}

/// 品質彙總結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QualityReport {
    /// 整體彙總
    Overall(QualitySummary),
    /// 依分組鍵的彙總
    Grouped(BTreeMap<String, QualityGroupSummary>),
}

/// 品質計算器
pub struct QualityCalculator;

impl QualityCalculator {
    /// 計算品質彙總
    pub fn calculate(records: &[&EnrichedRecord], grouping: Grouping) -> Result<QualityReport> {
        if records.is_empty() {
            return Err(KpiError::EmptyView);
        }

        match grouping {
            Grouping::Overall => Ok(QualityReport::Overall(Self::summarize(records))),
            Grouping::By(group_by) => {
                let groups = grouping::partition(records, group_by)
                    .into_iter()
                    .map(|(key, group)| (key, Self::summarize_group(&group)))
                    .collect();
                Ok(QualityReport::Grouped(groups))
            }
        }
    }

    pub(crate) fn summarize(records: &[&EnrichedRecord]) -> QualitySummary {
        let total_defects: f64 = records.iter().map(|r| r.base.quality_defects).sum();
        let total_production: f64 = records.iter().map(|r| r.base.actual_production).sum();
        let quality_rates: Vec<f64> = records.iter().map(|r| r.metrics.quality_rate).collect();

        QualitySummary {
            total_defects,
            total_production,
            overall_defect_rate: stats::pct_of_totals(total_defects, total_production)
                .map(stats::round3),
            average_quality_rate: stats::round2(stats::mean(&quality_rates)),
            best_quality_shift: stats::round2(stats::max(&quality_rates)),
            worst_quality_shift: stats::round2(stats::min(&quality_rates)),
            quality_consistency_std: stats::round2(stats::std_dev(&quality_rates)),
            total_shifts_analyzed: records.len(),
        }
    }

    fn summarize_group(records: &[&EnrichedRecord]) -> QualityGroupSummary {
        let defects: f64 = records.iter().map(|r| r.base.quality_defects).sum();
        let production: f64 = records.iter().map(|r| r.base.actual_production).sum();
        let quality_rates: Vec<f64> = records.iter().map(|r| r.metrics.quality_rate).collect();

        QualityGroupSummary {
            quality_defects: stats::round2(defects),
            actual_production: stats::round2(production),
            quality_rate: stats::round2(stats::mean(&quality_rates)),
            defect_rate: stats::pct_of_totals(defects, production).map(stats::round3),
        }
    }
}
