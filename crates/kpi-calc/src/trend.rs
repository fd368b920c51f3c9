//! 趨勢分析

use serde::Serialize;
use std::collections::BTreeMap;

use kpi_core::{KpiError, Result};

use crate::metrics::{EnrichedRecord, Metric};
use crate::stats;

/// 趨勢分桶維度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDimension {
    /// 依日曆日（時間趨勢）
    Date,
    /// 依機台
    Machine,
    /// 依班別
    Shift,
    /// 依操作員
    Operator,
}

/// 趨勢方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// 末桶嚴格高於首桶
    Improving,
    /// 其餘情況（含首尾相等）
    Declining,
}

/// 趨勢資料點
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// 分桶鍵（日期 ISO 字串或分類標籤）
    pub period: String,

    /// 桶內指標平均
    pub value: f64,
}

/// 趨勢分析結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    /// 分析的指標
    pub metric_analyzed: Metric,

    /// 依分桶鍵升冪排列的資料點
    pub trend_data: Vec<TrendPoint>,

    /// 趨勢方向（首尾嚴格比較）
    pub trend_direction: TrendDirection,

    /// 指標最高的分桶
    pub best_period: String,

    /// 指標最低的分桶
    pub worst_period: String,

    /// 各桶平均
    pub average_value: f64,

    /// 各桶樣本標準差（波動度）
    pub volatility: f64,
}

/// 趨勢計算器
pub struct TrendCalculator;

impl TrendCalculator {
    /// 計算趨勢
    ///
    /// 依維度分桶後取桶內指標平均；日期鍵為 ISO 字串，字典序即
    /// 時間序。平手時最佳/最差取鍵序在前的分桶。
    pub fn calculate(
        records: &[&EnrichedRecord],
        metric: Metric,
        dimension: TrendDimension,
    ) -> Result<TrendReport> {
        if records.is_empty() {
            return Err(KpiError::EmptyView);
        }

        let mut buckets: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for record in records {
            let key = match dimension {
                TrendDimension::Date => record.date().to_string(),
                TrendDimension::Machine => record.base.machine_id.clone(),
                TrendDimension::Shift => record.base.shift.to_string(),
                TrendDimension::Operator => record.base.operator_id.clone(),
            };
            buckets.entry(key).or_default().push(metric.value(record));
        }

        let trend_data: Vec<TrendPoint> = buckets
            .into_iter()
            .map(|(period, values)| TrendPoint {
                period,
                value: stats::round2(stats::mean(&values)),
            })
            .collect();

        // 首尾嚴格比較：相等視為 declining
        let first = &trend_data[0];
        let last = &trend_data[trend_data.len() - 1];
        let trend_direction = if last.value > first.value {
            TrendDirection::Improving
        } else {
            TrendDirection::Declining
        };

        let mut best = first;
        let mut worst = first;
        for point in &trend_data[1..] {
            if point.value > best.value {
                best = point;
            }
            if point.value < worst.value {
                worst = point;
            }
        }

        let values: Vec<f64> = trend_data.iter().map(|p| p.value).collect();
        let report = TrendReport {
            metric_analyzed: metric,
            trend_direction,
            best_period: best.period.clone(),
            worst_period: worst.period.clone(),
            average_value: stats::round2(stats::mean(&values)),
            volatility: stats::round2(stats::std_dev(&values)),
            trend_data,
        };
        Ok(report)
    }
}
