//! # KPI Calculation Engine
//!
//! 核心 KPI 計算引擎：衍生指標 enrichment、分組彙總、排名與趨勢分析

pub mod analyzer;
pub mod downtime;
pub mod efficiency;
pub mod grouping;
pub mod metrics;
pub mod oee;
pub mod quality;
pub mod ranking;
pub mod report;
pub mod stats;
pub mod throughput;
pub mod trend;

// Re-export 主要類型
pub use analyzer::KpiAnalyzer;
pub use downtime::{DowntimeCalculator, DowntimeGroupSummary, DowntimeReport, DowntimeSummary};
pub use efficiency::{
    EfficiencyCalculator, EfficiencyGroupSummary, EfficiencyReport, EfficiencySummary,
};
pub use grouping::{GroupBy, Grouping};
pub use metrics::{enrich, DerivedMetrics, EnrichedRecord, Metric};
pub use oee::{OeeCalculator, OeeGroupSummary, OeeReport, OeeSummary};
pub use quality::{QualityCalculator, QualityGroupSummary, QualityReport, QualitySummary};
pub use ranking::{RankEntry, RankingCalculator, TopPerformers};
pub use report::{ComparisonCalculator, DataOverview, MachineKpiPanel, SummaryReport};
pub use throughput::{
    ThroughputCalculator, ThroughputGroupSummary, ThroughputReport, ThroughputSummary,
};
pub use trend::{TrendCalculator, TrendDimension, TrendDirection, TrendPoint, TrendReport};
