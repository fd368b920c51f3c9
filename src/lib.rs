//! # Manufacturing KPI Toolkit
//!
//! 對外彙整 kpi-core 與 kpi-calc 的公開介面

pub use kpi_calc::{
    enrich, ComparisonCalculator, DataOverview, DerivedMetrics, DowntimeCalculator,
    DowntimeReport, DowntimeSummary, EfficiencyCalculator, EfficiencyReport, EfficiencySummary,
    EnrichedRecord, GroupBy, Grouping, KpiAnalyzer, MachineKpiPanel, Metric, OeeCalculator,
    OeeReport, OeeSummary, QualityCalculator, QualityReport, QualitySummary, RankEntry,
    RankingCalculator, SummaryReport, ThroughputCalculator, ThroughputReport, ThroughputSummary,
    TopPerformers, TrendCalculator, TrendDimension, TrendDirection, TrendPoint, TrendReport,
};
pub use kpi_core::{
    load_records, DateRange, KpiError, Result, Shift, ShiftRecord, REQUIRED_COLUMNS,
    SHIFT_MINUTES,
};
