//! # KPI Core
//!
//! 核心資料模型與類型定義

pub mod loader;
pub mod range;
pub mod record;

// Re-export 主要類型
pub use loader::{load_records, REQUIRED_COLUMNS};
pub use range::DateRange;
pub use record::{Shift, ShiftRecord, SHIFT_MINUTES};

/// KPI 錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum KpiError {
    #[error("資料載入失敗: {0}")]
    DataLoad(String),

    #[error("缺少必要欄位: {0}")]
    MissingColumn(String),

    #[error("無效的指標名稱: {0}（可用: oee, efficiency, quality_rate, availability, performance）")]
    InvalidMetric(String),

    #[error("無效的班別: {0}")]
    InvalidShift(String),

    #[error("無效的日期區間: 起日 {start} 晚於迄日 {end}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("選定區間內沒有任何紀錄")]
    EmptyView,
}

pub type Result<T> = std::result::Result<T, KpiError>;
