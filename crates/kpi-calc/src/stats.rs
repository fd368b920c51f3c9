//! 統計與除法守則輔助函式
//!
//! 五個彙總族群共用的具名守則，取代散落在各公式裡的臨時判斷：
//! - 空視圖由各計算器入口先行擋下（`KpiError::EmptyView`）
//! - 逐列公式的分母為零時回哨兵值 `0.0`
//! - 總量比率的分母為零時回 `None`（JSON 輸出為 `null`），
//!   絕不回錯誤的數字

use statrs::statistics::Statistics;

/// 四捨五入到小數點後 1 位
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 四捨五入到小數點後 2 位
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 四捨五入到小數點後 3 位
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// 逐列百分比守則：分母為 0 時回哨兵值 0
pub fn pct_or_zero(numer: f64, denom: f64) -> f64 {
    if denom == 0.0 {
        0.0
    } else {
        numer / denom * 100.0
    }
}

/// 總量比率守則：分母總量為 0 時回 None
pub fn ratio_of_totals(numer: f64, denom: f64) -> Option<f64> {
    if denom == 0.0 {
        None
    } else {
        Some(numer / denom)
    }
}

/// 總量百分比守則：分母總量為 0 時回 None
pub fn pct_of_totals(numer: f64, denom: f64) -> Option<f64> {
    ratio_of_totals(numer, denom).map(|ratio| ratio * 100.0)
}

/// 平均值；呼叫端保證非空
pub fn mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

/// 樣本標準差（n−1 分母）；少於兩筆時回 0
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        0.0
    } else {
        values.iter().std_dev()
    }
}

/// 最大值；呼叫端保證非空
pub fn max(values: &[f64]) -> f64 {
    Statistics::max(values.iter())
}

/// 最小值；呼叫端保證非空
pub fn min(values: &[f64]) -> f64 {
    Statistics::min(values.iter())
}
