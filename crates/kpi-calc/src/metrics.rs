//! 衍生指標計算（逐列 enrichment）

use chrono::NaiveDate;
use kpi_core::{KpiError, ShiftRecord, SHIFT_MINUTES};
use serde::Serialize;

use crate::stats;

/// 衍生指標
///
/// 由單列基礎欄位一次算出；enrichment 之後不再變動，重算必得相同值。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    /// 效率 = 實際產量 / 目標產量 × 100
    pub efficiency: f64,

    /// 可用時間（分鐘）= 480 − 停機時間；停機超過班次長度時為負，不截斷
    pub available_minutes: f64,

    /// 稼動率 = 可用時間 / 480 × 100
    pub availability: f64,

    /// 表現率 = 實際產量 / (目標產量 × max(可用時間比, 0.001)) × 100
    pub performance: f64,

    /// 良率 = (實際產量 − 不良品) / 實際產量 × 100
    pub quality_rate: f64,

    /// OEE = 稼動率 × 表現率 × 良率 / 10000
    pub oee: f64,
}

impl DerivedMetrics {
    /// 由基礎欄位計算衍生指標
    ///
    /// 除零守則：目標產量為 0 時 efficiency 與 performance 回 0；
    /// 實際產量為 0 時 quality_rate 回 0。
    pub fn from_record(record: &ShiftRecord) -> Self {
        let available_minutes = SHIFT_MINUTES - record.downtime_minutes;

        let efficiency = stats::round2(stats::pct_or_zero(
            record.actual_production,
            record.target_production,
        ));

        let availability = stats::round2(available_minutes / SHIFT_MINUTES * 100.0);

        // 0.001 下限避免可用時間趨近零時比值爆掉
        let performance = if available_minutes > 0.0 {
            let time_ratio = (available_minutes / SHIFT_MINUTES).max(0.001);
            stats::round2(stats::pct_or_zero(
                record.actual_production,
                record.target_production * time_ratio,
            ))
        } else {
            0.0
        };

        let quality_rate = if record.actual_production > 0.0 {
            stats::round2(
                (record.actual_production - record.quality_defects) / record.actual_production
                    * 100.0,
            )
        } else {
            0.0
        };

        let oee = stats::round2(availability * performance * quality_rate / 10_000.0);

        Self {
            efficiency,
            available_minutes,
            availability,
            performance,
            quality_rate,
            oee,
        }
    }
}

/// 含衍生指標的班次紀錄
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    /// 基礎欄位
    #[serde(flatten)]
    pub base: ShiftRecord,

    /// 衍生指標
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
}

impl EnrichedRecord {
    /// 紀錄所屬日曆日
    pub fn date(&self) -> NaiveDate {
        self.base.timestamp.date()
    }
}

/// 衍生指標計算 pass
///
/// 整表單次掃過，產出新的不可變 enriched 資料表；原始列被移入
/// `EnrichedRecord`，下游一律唯讀。
pub fn enrich(records: Vec<ShiftRecord>) -> Vec<EnrichedRecord> {
    records
        .into_iter()
        .map(|base| {
            let metrics = DerivedMetrics::from_record(&base);
            EnrichedRecord { base, metrics }
        })
        .collect()
}

/// 可供排名、趨勢與比較查詢使用的指標
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Oee,
    Efficiency,
    QualityRate,
    Availability,
    Performance,
}

impl Metric {
    /// 指標名稱（查詢介面使用的字串）
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Oee => "oee",
            Metric::Efficiency => "efficiency",
            Metric::QualityRate => "quality_rate",
            Metric::Availability => "availability",
            Metric::Performance => "performance",
        }
    }

    /// 取出單筆紀錄上的指標值
    pub fn value(&self, record: &EnrichedRecord) -> f64 {
        match self {
            Metric::Oee => record.metrics.oee,
            Metric::Efficiency => record.metrics.efficiency,
            Metric::QualityRate => record.metrics.quality_rate,
            Metric::Availability => record.metrics.availability,
            Metric::Performance => record.metrics.performance,
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = KpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oee" => Ok(Metric::Oee),
            "efficiency" => Ok(Metric::Efficiency),
            "quality_rate" => Ok(Metric::QualityRate),
            "availability" => Ok(Metric::Availability),
            "performance" => Ok(Metric::Performance),
            _ => Err(KpiError::InvalidMetric(s.to_string())),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kpi_core::Shift;
    use proptest::prelude::*;
    use rstest::rstest;

    fn record(target: f64, actual: f64, downtime: f64, defects: f64) -> ShiftRecord {
        ShiftRecord::new(
            NaiveDate::from_ymd_opt(2026, 7, 6)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap(),
            "A1".to_string(),
            "OP001".to_string(),
            Shift::Morning,
            target,
            actual,
        )
        .with_downtime(downtime)
        .with_defects(defects)
    }

    #[test]
    fn test_full_shift_no_downtime() {
        let metrics = DerivedMetrics::from_record(&record(100.0, 90.0, 0.0, 0.0));

        assert_eq!(metrics.efficiency, 90.0);
        assert_eq!(metrics.available_minutes, 480.0);
        assert_eq!(metrics.availability, 100.0);
        assert_eq!(metrics.performance, 90.0);
        assert_eq!(metrics.quality_rate, 100.0);
        // OEE = 100 × 90 × 100 / 10000
        assert_eq!(metrics.oee, 90.0);
    }

    #[test]
    fn test_full_downtime_shift() {
        // 整班停機：稼動率 0、表現率走 0 分支、OEE 歸零
        let metrics = DerivedMetrics::from_record(&record(50.0, 50.0, 480.0, 0.0));

        assert_eq!(metrics.available_minutes, 0.0);
        assert_eq!(metrics.availability, 0.0);
        assert_eq!(metrics.performance, 0.0);
        assert_eq!(metrics.quality_rate, 100.0);
        assert_eq!(metrics.oee, 0.0);
    }

    #[test]
    fn test_downtime_beyond_shift_is_not_clamped() {
        let metrics = DerivedMetrics::from_record(&record(100.0, 10.0, 510.0, 0.0));

        assert_eq!(metrics.available_minutes, -30.0);
        assert_eq!(metrics.availability, -6.25);
        assert_eq!(metrics.performance, 0.0);
        assert_eq!(metrics.oee, -0.0);
    }

    #[test]
    fn test_performance_uses_time_ratio_floor() {
        // 可用 1 分鐘：1/480 ≈ 0.00208 仍高於 0.001 下限
        let metrics = DerivedMetrics::from_record(&record(480.0, 10.0, 479.0, 0.0));
        assert_eq!(metrics.performance, 1000.0);

        // 下限生效的情況需要 available/480 < 0.001，即可用時間 < 0.48 分鐘
        let floored = DerivedMetrics::from_record(&record(1000.0, 10.0, 479.9, 0.0));
        assert_eq!(floored.performance, 1000.0);
    }

    #[test]
    fn test_zero_target_production_policy() {
        // 設計決策：目標產量為 0 時 efficiency 與 performance 都回哨兵值 0
        let metrics = DerivedMetrics::from_record(&record(0.0, 30.0, 0.0, 0.0));

        assert_eq!(metrics.efficiency, 0.0);
        assert_eq!(metrics.performance, 0.0);
        assert_eq!(metrics.quality_rate, 100.0);
        assert_eq!(metrics.oee, 0.0);
    }

    #[test]
    fn test_zero_actual_production_quality_rate() {
        let metrics = DerivedMetrics::from_record(&record(100.0, 0.0, 0.0, 0.0));
        assert_eq!(metrics.quality_rate, 0.0);
    }

    #[test]
    fn test_quality_rate_with_defects() {
        let metrics = DerivedMetrics::from_record(&record(800.0, 750.0, 30.0, 15.0));

        assert_eq!(metrics.quality_rate, 98.0);
        assert_eq!(metrics.availability, 93.75);
    }

    #[test]
    fn test_enrich_preserves_order_and_count() {
        let records = vec![
            record(100.0, 90.0, 0.0, 0.0),
            record(50.0, 50.0, 480.0, 0.0),
        ];

        let enriched = enrich(records);

        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0].metrics.oee, 90.0);
        assert_eq!(enriched[1].metrics.oee, 0.0);
    }

    #[rstest]
    #[case("oee", Metric::Oee)]
    #[case("EFFICIENCY", Metric::Efficiency)]
    #[case("quality_rate", Metric::QualityRate)]
    #[case("availability", Metric::Availability)]
    #[case("performance", Metric::Performance)]
    fn test_metric_parse(#[case] name: &str, #[case] expected: Metric) {
        assert_eq!(name.parse::<Metric>().unwrap(), expected);
    }

    #[test]
    fn test_metric_parse_invalid() {
        let error = "throughput".parse::<Metric>().unwrap_err();
        assert!(matches!(error, KpiError::InvalidMetric(name) if name == "throughput"));
    }

    proptest! {
        /// 相同基礎欄位重算必得相同衍生值（無隱藏狀態）
        #[test]
        fn prop_enrichment_is_deterministic(
            target in 0.0f64..2000.0,
            actual in 0.0f64..2000.0,
            downtime in 0.0f64..600.0,
            defects in 0.0f64..100.0,
        ) {
            let base = record(target, actual, downtime, defects);
            let first = DerivedMetrics::from_record(&base);
            let second = DerivedMetrics::from_record(&base);
            prop_assert_eq!(first, second);
        }

        /// OEE 永遠可由其他三個衍生欄位重組
        #[test]
        fn prop_oee_recomposes_from_components(
            target in 1.0f64..2000.0,
            actual in 0.0f64..2000.0,
            downtime in 0.0f64..480.0,
            defects in 0.0f64..100.0,
        ) {
            let metrics = DerivedMetrics::from_record(&record(target, actual, downtime, defects));
            let recomposed = crate::stats::round2(
                metrics.availability * metrics.performance * metrics.quality_rate / 10_000.0,
            );
            prop_assert_eq!(metrics.oee, recomposed);
        }
    }
}
