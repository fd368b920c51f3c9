//! 排名分析

use kpi_core::{KpiError, Result};
use serde::Serialize;

use crate::grouping::{self, GroupBy};
use crate::metrics::{EnrichedRecord, Metric};
use crate::stats;

/// 排名項目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankEntry {
    /// 機台或操作員 ID
    pub id: String,

    /// 指標平均值
    pub value: f64,
}

/// 排名結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPerformers {
    /// 排名依據的指標
    pub metric_analyzed: Metric,

    /// 機台排名（指標平均遞減）
    pub top_machines: Vec<RankEntry>,

    /// 操作員排名（指標平均遞減）
    pub top_operators: Vec<RankEntry>,

    /// 資料中的機台總數
    pub total_machines: usize,

    /// 資料中的操作員總數
    pub total_operators: usize,
}

/// 排名計算器
pub struct RankingCalculator;

impl RankingCalculator {
    /// 依指標取前 n 名機台與操作員
    ///
    /// 不足 n 個鍵時回傳全部。平手時依鍵的字典序：分組先依鍵排序，
    /// 再以穩定排序依值遞減。
    pub fn top_performers(
        records: &[&EnrichedRecord],
        metric: Metric,
        top_n: usize,
    ) -> Result<TopPerformers> {
        if records.is_empty() {
            return Err(KpiError::EmptyView);
        }

        let by_machine = Self::ranked_means(records, GroupBy::MachineId, metric);
        let by_operator = Self::ranked_means(records, GroupBy::OperatorId, metric);

        Ok(TopPerformers {
            metric_analyzed: metric,
            total_machines: by_machine.len(),
            total_operators: by_operator.len(),
            top_machines: by_machine.into_iter().take(top_n).collect(),
            top_operators: by_operator.into_iter().take(top_n).collect(),
        })
    }

    /// 分組取指標平均後遞減排序
    fn ranked_means(
        records: &[&EnrichedRecord],
        group_by: GroupBy,
        metric: Metric,
    ) -> Vec<RankEntry> {
        // BTreeMap 已依鍵排序，穩定排序保平手時維持鍵序
        let mut entries: Vec<RankEntry> = grouping::partition(records, group_by)
            .into_iter()
            .map(|(id, group)| {
                let values: Vec<f64> = group.iter().map(|r| metric.value(r)).collect();
                RankEntry {
                    id,
                    value: stats::round2(stats::mean(&values)),
                }
            })
            .collect();
        entries.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        entries
    }
}
