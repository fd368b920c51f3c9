//! # KPI Datagen
//!
//! 模擬班次資料生成器：依機台可靠度與班別係數產生擬真的
//! 生產紀錄，固定種子可重現，供示範與測試使用。

use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use kpi_core::{KpiError, Result, Shift, ShiftRecord};
use rand::prelude::*;
use rand_distr::Normal;

/// 機台參數
#[derive(Debug, Clone, Copy)]
pub struct MachineProfile {
    /// 機台ID
    pub machine_id: &'static str,

    /// 每小時目標產量
    pub target_rate: f64,

    /// 可靠度（影響效率與停機）
    pub reliability: f64,
}

/// 預設六台機台：高效機、一般機、老舊機、問題機與兩台新機
pub const DEFAULT_MACHINES: [MachineProfile; 6] = [
    MachineProfile { machine_id: "A1", target_rate: 100.0, reliability: 0.95 },
    MachineProfile { machine_id: "A2", target_rate: 100.0, reliability: 0.88 },
    MachineProfile { machine_id: "B1", target_rate: 85.0, reliability: 0.92 },
    MachineProfile { machine_id: "B2", target_rate: 85.0, reliability: 0.85 },
    MachineProfile { machine_id: "C1", target_rate: 120.0, reliability: 0.93 },
    MachineProfile { machine_id: "C2", target_rate: 120.0, reliability: 0.90 },
];

/// 預設操作員
pub const DEFAULT_OPERATORS: [&str; 6] = ["OP001", "OP002", "OP003", "OP004", "OP005", "OP006"];

/// 生成配置
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// 生成天數
    pub days: u32,

    /// 起始日期
    pub start_date: NaiveDate,

    /// 隨機種子
    pub seed: u64,

    /// 是否跳過週末
    pub skip_weekends: bool,
}

impl GeneratorConfig {
    /// 創建新的生成配置（預設種子 1、跳過週末）
    pub fn new(days: u32, start_date: NaiveDate) -> Self {
        Self {
            days,
            start_date,
            seed: 1,
            skip_weekends: true,
        }
    }

    /// 建構器模式：設置隨機種子
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// 建構器模式：設置是否跳過週末
    pub fn with_skip_weekends(mut self, skip: bool) -> Self {
        self.skip_weekends = skip;
        self
    }
}

/// 班別表現係數：早班最佳、午班微降、夜班最低
fn shift_factor(shift: Shift) -> f64 {
    match shift {
        Shift::Morning => 1.0,
        Shift::Afternoon => 0.95,
        Shift::Night => 0.85,
    }
}

/// 生成模擬班次紀錄
pub fn generate(config: &GeneratorConfig) -> Vec<ShiftRecord> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let efficiency_noise = Normal::new(1.0, 0.1).expect("常態分布參數無效");
    let downtime_noise = Normal::new(0.0, 20.0).expect("常態分布參數無效");

    let mut records = Vec::new();
    for day in 0..config.days {
        let date = config.start_date + Duration::days(i64::from(day));
        if config.skip_weekends && matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }

        for shift in Shift::all() {
            for profile in DEFAULT_MACHINES {
                let operator = DEFAULT_OPERATORS
                    .choose(&mut rng)
                    .copied()
                    .unwrap_or(DEFAULT_OPERATORS[0]);

                // 8 小時班次的目標量
                let target_production = profile.target_rate * 8.0;

                // 效率 = 可靠度 × 班別係數 × ±10% 雜訊，夾在合理範圍
                let efficiency: f64 = (profile.reliability
                    * shift_factor(shift)
                    * efficiency_noise.sample(&mut rng))
                .clamp(0.3, 1.2);
                let actual_production = (target_production * efficiency).floor();

                // 停機與可靠度反相關
                let base_downtime = (1.0 - profile.reliability) * 480.0;
                let downtime_minutes =
                    (base_downtime + downtime_noise.sample(&mut rng)).max(0.0).floor();

                // 不良品約佔產量 1–5%
                let defect_rate = rng.gen_range(0.01..0.05);
                let quality_defects = (actual_production * defect_rate).floor();

                let timestamp = date
                    .and_hms_opt(shift.start_hour(), 0, 0)
                    .expect("無效的班次時間");

                records.push(
                    ShiftRecord::new(
                        timestamp,
                        profile.machine_id.to_string(),
                        operator.to_string(),
                        shift,
                        target_production,
                        actual_production,
                    )
                    .with_downtime(downtime_minutes)
                    .with_defects(quality_defects)
                    .with_setup_time((rng.gen_range(15.0f64..45.0)).floor())
                    .with_material_waste(rng.gen_range(2.0..8.0)),
                );
            }
        }
    }

    records
}

/// 將紀錄寫出為 CSV（表頭取自欄位名稱）
pub fn write_csv<P: AsRef<Path>>(path: P, records: &[ShiftRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| KpiError::DataLoad(format!("{}: {e}", path.display())))?;

    for record in records {
        writer
            .serialize(record)
            .map_err(|e| KpiError::DataLoad(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| KpiError::DataLoad(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        // 2026-07-06 是週一
        NaiveDate::from_ymd_opt(2026, 7, 6).unwrap()
    }

    #[test]
    fn test_generate_full_week_skips_weekend() {
        let config = GeneratorConfig::new(7, monday());

        let records = generate(&config);

        // 5 個工作日 × 3 班 × 6 機台
        assert_eq!(records.len(), 5 * 3 * 6);
    }

    #[test]
    fn test_generate_including_weekends() {
        let config = GeneratorConfig::new(7, monday()).with_skip_weekends(false);

        let records = generate(&config);

        assert_eq!(records.len(), 7 * 3 * 6);
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let config = GeneratorConfig::new(5, monday()).with_seed(42);

        let first = generate(&config);
        let second = generate(&config);

        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seeds_differ() {
        let base = GeneratorConfig::new(5, monday());

        let first = generate(&base.clone().with_seed(1));
        let second = generate(&base.with_seed(2));

        assert_ne!(first, second);
    }

    #[test]
    fn test_generated_values_are_plausible() {
        let records = generate(&GeneratorConfig::new(10, monday()));

        for record in &records {
            assert!(record.target_production > 0.0);
            assert!(record.actual_production >= 0.0);
            // 效率夾在 [0.3, 1.2]
            assert!(record.actual_production <= record.target_production * 1.2);
            assert!(record.downtime_minutes >= 0.0);
            assert!(record.quality_defects <= record.actual_production);
            assert!(record.setup_time_minutes.is_some());
            assert!(record.material_waste_kg.is_some());
        }
    }

    #[test]
    fn test_csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv");
        let records = generate(&GeneratorConfig::new(3, monday()));

        write_csv(&path, &records).unwrap();
        let loaded = kpi_core::load_records(&path).unwrap();

        assert_eq!(loaded.len(), records.len());
        assert_eq!(loaded[0].machine_id, records[0].machine_id);
        assert_eq!(loaded[0].timestamp, records[0].timestamp);
    }
}
