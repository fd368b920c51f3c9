//! KPI 分析器（對外查詢門面）

use std::path::Path;

use kpi_core::{DateRange, KpiError, Result, ShiftRecord};

use crate::downtime::{DowntimeCalculator, DowntimeReport};
use crate::efficiency::{EfficiencyCalculator, EfficiencyReport};
use crate::grouping::Grouping;
use crate::metrics::{self, EnrichedRecord, Metric};
use crate::oee::{OeeCalculator, OeeReport};
use crate::quality::{QualityCalculator, QualityReport};
use crate::ranking::{RankingCalculator, TopPerformers};
use crate::report::{ComparisonCalculator, DataOverview, MachineKpiPanel, SummaryReport};
use crate::throughput::{ThroughputCalculator, ThroughputReport};
use crate::trend::{TrendCalculator, TrendDimension, TrendReport};

/// KPI 分析器
///
/// 建構時載入資料表並一次性計算衍生指標；此後所有查詢都是
/// 對不可變 enriched 資料表的唯讀化簡，不會再改動任何紀錄。
#[derive(Debug)]
pub struct KpiAnalyzer {
    /// enriched 資料表
    records: Vec<EnrichedRecord>,
}

impl KpiAnalyzer {
    /// 從 CSV 檔建立分析器（載入 → enrichment 的一次性初始化）
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = kpi_core::load_records(&path)?;
        tracing::info!("載入 {} 筆班次紀錄: {}", raw.len(), path.as_ref().display());
        Ok(Self::new(raw))
    }

    /// 由既有紀錄建立分析器
    pub fn new(records: Vec<ShiftRecord>) -> Self {
        let records = metrics::enrich(records);
        tracing::debug!("衍生指標計算完成: {} 筆", records.len());
        Self { records }
    }

    /// 依日期區間取得唯讀視圖；None 代表全表
    fn view(&self, date_range: Option<&DateRange>) -> Vec<&EnrichedRecord> {
        match date_range {
            None => self.records.iter().collect(),
            Some(range) => self
                .records
                .iter()
                .filter(|record| range.contains(record.base.timestamp))
                .collect(),
        }
    }

    /// 效率彙總
    pub fn efficiency(
        &self,
        grouping: Grouping,
        date_range: Option<&DateRange>,
    ) -> Result<EfficiencyReport> {
        EfficiencyCalculator::calculate(&self.view(date_range), grouping)
    }

    /// OEE 彙總
    pub fn oee(&self, grouping: Grouping, date_range: Option<&DateRange>) -> Result<OeeReport> {
        OeeCalculator::calculate(&self.view(date_range), grouping)
    }

    /// 產出彙總
    pub fn throughput(
        &self,
        grouping: Grouping,
        date_range: Option<&DateRange>,
    ) -> Result<ThroughputReport> {
        ThroughputCalculator::calculate(&self.view(date_range), grouping)
    }

    /// 停機彙總
    pub fn downtime(
        &self,
        grouping: Grouping,
        date_range: Option<&DateRange>,
    ) -> Result<DowntimeReport> {
        DowntimeCalculator::calculate(&self.view(date_range), grouping)
    }

    /// 品質彙總
    pub fn quality(
        &self,
        grouping: Grouping,
        date_range: Option<&DateRange>,
    ) -> Result<QualityReport> {
        QualityCalculator::calculate(&self.view(date_range), grouping)
    }

    /// 依指標取前 n 名機台與操作員（一律排名全表）
    pub fn top_performers(&self, metric: Metric, top_n: usize) -> Result<TopPerformers> {
        RankingCalculator::top_performers(&self.view(None), metric, top_n)
    }

    /// 趨勢分析
    pub fn trend(
        &self,
        metric: Metric,
        dimension: TrendDimension,
        date_range: Option<&DateRange>,
    ) -> Result<TrendReport> {
        TrendCalculator::calculate(&self.view(date_range), metric, dimension)
    }

    /// 機台全指標比較
    pub fn machine_comparison(
        &self,
        metric: Metric,
        date_range: Option<&DateRange>,
    ) -> Result<Vec<MachineKpiPanel>> {
        ComparisonCalculator::machine_comparison(&self.view(date_range), metric)
    }

    /// 綜合報告：資料概況 + 五大 KPI 整體彙總 + 排名快照
    pub fn summary_report(&self, date_range: Option<&DateRange>) -> Result<SummaryReport> {
        let view = self.view(date_range);
        if view.is_empty() {
            return Err(KpiError::EmptyView);
        }
        tracing::debug!("產生綜合報告: {} 筆", view.len());

        Ok(SummaryReport {
            data_overview: DataOverview::from_records(&view),
            overall_kpis: OeeCalculator::summarize(&view),
            efficiency: EfficiencyCalculator::summarize(&view),
            throughput: ThroughputCalculator::summarize(&view),
            downtime: DowntimeCalculator::summarize(&view),
            quality: QualityCalculator::summarize(&view),
            top_performers: RankingCalculator::top_performers(&self.view(None), Metric::Oee, 3)?,
        })
    }

    /// enriched 資料表的唯讀存取
    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    /// 紀錄筆數
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 是否為空表
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
