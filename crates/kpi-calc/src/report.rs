//! 綜合報告與機台比較

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use kpi_core::{KpiError, Result};
use serde::Serialize;

use crate::downtime::DowntimeSummary;
use crate::efficiency::EfficiencySummary;
use crate::grouping::{self, GroupBy};
use crate::metrics::{EnrichedRecord, Metric};
use crate::oee::OeeSummary;
use crate::quality::QualitySummary;
use crate::ranking::TopPerformers;
use crate::stats;
use crate::throughput::ThroughputSummary;

/// 資料概況
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataOverview {
    /// 紀錄總數
    pub total_records: usize,

    /// 資料起日
    pub start_date: NaiveDate,

    /// 資料迄日
    pub end_date: NaiveDate,

    /// 分析天數（首尾時間戳，含兩端）
    pub analysis_days: i64,

    /// 機台清單（字典序）
    pub machines: Vec<String>,

    /// 操作員清單（字典序）
    pub operators: Vec<String>,

    /// 各班別的紀錄數
    pub shifts_analyzed: BTreeMap<String, usize>,
}

impl DataOverview {
    /// 由視圖建立資料概況；呼叫端保證非空
    pub(crate) fn from_records(records: &[&EnrichedRecord]) -> Self {
        let timestamps: Vec<_> = records.iter().map(|r| r.base.timestamp).collect();
        let first = timestamps.iter().min().copied().unwrap_or_default();
        let last = timestamps.iter().max().copied().unwrap_or_default();

        let machines: BTreeSet<String> =
            records.iter().map(|r| r.base.machine_id.clone()).collect();
        let operators: BTreeSet<String> =
            records.iter().map(|r| r.base.operator_id.clone()).collect();

        let mut shifts_analyzed: BTreeMap<String, usize> = BTreeMap::new();
        for record in records {
            *shifts_analyzed
                .entry(record.base.shift.to_string())
                .or_default() += 1;
        }

        Self {
            total_records: records.len(),
            start_date: first.date(),
            end_date: last.date(),
            analysis_days: (last - first).num_days() + 1,
            machines: machines.into_iter().collect(),
            operators: operators.into_iter().collect(),
            shifts_analyzed,
        }
    }
}

/// 綜合報告：資料概況 + 五大 KPI 整體彙總 + 排名快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    /// 資料概況
    pub data_overview: DataOverview,

    /// OEE 整體彙總
    pub overall_kpis: OeeSummary,

    /// 效率整體彙總
    pub efficiency: EfficiencySummary,

    /// 產出整體彙總
    pub throughput: ThroughputSummary,

    /// 停機整體彙總
    pub downtime: DowntimeSummary,

    /// 品質整體彙總
    pub quality: QualitySummary,

    /// 預設排名（OEE 前三名）
    pub top_performers: TopPerformers,
}

/// 機台比較面板（單一機台的完整 KPI）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineKpiPanel {
    /// 機台ID
    pub machine_id: String,

    /// 逐列 OEE 的平均
    pub oee: f64,

    /// 逐列效率的平均
    pub efficiency: f64,

    /// 逐列稼動率的平均
    pub availability: f64,

    /// 逐列表現率的平均
    pub performance: f64,

    /// 逐列良率的平均
    pub quality_rate: f64,

    /// 實際產量總和
    pub actual_production: f64,

    /// 停機分鐘總和
    pub downtime_minutes: f64,

    /// 總停機時數
    pub total_downtime_hours: f64,

    /// 運轉班次數
    pub shifts_operated: usize,
}

impl MachineKpiPanel {
    /// 取出面板上的指標值（排序用）
    fn metric_value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Oee => self.oee,
            Metric::Efficiency => self.efficiency,
            Metric::QualityRate => self.quality_rate,
            Metric::Availability => self.availability,
            Metric::Performance => self.performance,
        }
    }
}

/// 機台比較計算器
pub struct ComparisonCalculator;

impl ComparisonCalculator {
    /// 機台全指標比較，依指定指標遞減排序
    ///
    /// 平手時依機台 ID 字典序（分組輸出已排序，穩定排序保鍵序）。
    pub fn machine_comparison(
        records: &[&EnrichedRecord],
        metric: Metric,
    ) -> Result<Vec<MachineKpiPanel>> {
        if records.is_empty() {
            return Err(KpiError::EmptyView);
        }

        let mut panels: Vec<MachineKpiPanel> =
            grouping::partition(records, GroupBy::MachineId)
                .into_iter()
                .map(|(machine_id, group)| Self::panel(machine_id, &group))
                .collect();

        panels.sort_by(|a, b| {
            b.metric_value(metric)
                .partial_cmp(&a.metric_value(metric))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(panels)
    }

    fn panel(machine_id: String, records: &[&EnrichedRecord]) -> MachineKpiPanel {
        let oees: Vec<f64> = records.iter().map(|r| r.metrics.oee).collect();
        let efficiencies: Vec<f64> = records.iter().map(|r| r.metrics.efficiency).collect();
        let availabilities: Vec<f64> = records.iter().map(|r| r.metrics.availability).collect();
        let performances: Vec<f64> = records.iter().map(|r| r.metrics.performance).collect();
        let quality_rates: Vec<f64> = records.iter().map(|r| r.metrics.quality_rate).collect();
        let downtime: f64 = records.iter().map(|r| r.base.downtime_minutes).sum();

        MachineKpiPanel {
            machine_id,
            oee: stats::round2(stats::mean(&oees)),
            efficiency: stats::round2(stats::mean(&efficiencies)),
            availability: stats::round2(stats::mean(&availabilities)),
            performance: stats::round2(stats::mean(&performances)),
            quality_rate: stats::round2(stats::mean(&quality_rates)),
            actual_production: records.iter().map(|r| r.base.actual_production).sum(),
            downtime_minutes: downtime,
            total_downtime_hours: stats::round1(downtime / 60.0),
            shifts_operated: records.len(),
        }
    }
}
