//! 日期區間

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 閉區間日期範圍（兩端皆含）
///
/// 篩選一律以日曆日比較：落在迄日當天任何時刻的紀錄都算在區間內，
/// 即起訖日分別對齊到當日開始與當日結束。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// 起日
    pub start: NaiveDate,
    /// 迄日
    pub end: NaiveDate,
}

impl DateRange {
    /// 創建日期區間；起日晚於迄日屬呼叫端錯誤，立即失敗
    pub fn new(start: NaiveDate, end: NaiveDate) -> crate::Result<Self> {
        if start > end {
            return Err(crate::KpiError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// 檢查時間戳是否落在區間內
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        let date = timestamp.date();
        self.start <= date && date <= self.end
    }

    /// 區間天數（含兩端）
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
