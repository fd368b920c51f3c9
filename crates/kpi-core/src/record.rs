//! 班次紀錄模型

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 單一班次長度（分鐘）
pub const SHIFT_MINUTES: f64 = 480.0;

/// 班別
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Shift {
    /// 早班（06:00 開始）
    Morning,
    /// 午班（14:00 開始）
    Afternoon,
    /// 夜班（22:00 開始）
    Night,
}

impl Shift {
    /// 班別標籤（資料檔中的欄位值）
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Morning => "Morning",
            Shift::Afternoon => "Afternoon",
            Shift::Night => "Night",
        }
    }

    /// 班次開始小時
    pub fn start_hour(&self) -> u32 {
        match self {
            Shift::Morning => 6,
            Shift::Afternoon => 14,
            Shift::Night => 22,
        }
    }

    /// 全部班別（依時間順序）
    pub fn all() -> [Shift; 3] {
        [Shift::Morning, Shift::Afternoon, Shift::Night]
    }
}

impl std::str::FromStr for Shift {
    type Err = crate::KpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(Shift::Morning),
            "afternoon" => Ok(Shift::Afternoon),
            "night" => Ok(Shift::Night),
            _ => Err(crate::KpiError::InvalidShift(s.to_string())),
        }
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Shift {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// 班次紀錄（資料表的一列）
///
/// 衍生指標不在此結構上；載入後由計算引擎一次性 enrichment 產生。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRecord {
    /// 班次開始時間
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,

    /// 機台ID
    pub machine_id: String,

    /// 操作員ID
    pub operator_id: String,

    /// 班別
    pub shift: Shift,

    /// 目標產量
    pub target_production: f64,

    /// 實際產量
    pub actual_production: f64,

    /// 停機時間（分鐘）
    pub downtime_minutes: f64,

    /// 不良品數
    pub quality_defects: f64,

    /// 換線時間（分鐘）— 讀入但核心計算不使用
    #[serde(default)]
    pub setup_time_minutes: Option<f64>,

    /// 物料損耗（公斤）— 讀入但核心計算不使用
    #[serde(default)]
    pub material_waste_kg: Option<f64>,
}

impl ShiftRecord {
    /// 創建新的班次紀錄
    pub fn new(
        timestamp: NaiveDateTime,
        machine_id: String,
        operator_id: String,
        shift: Shift,
        target_production: f64,
        actual_production: f64,
    ) -> Self {
        Self {
            timestamp,
            machine_id,
            operator_id,
            shift,
            target_production,
            actual_production,
            downtime_minutes: 0.0,
            quality_defects: 0.0,
            setup_time_minutes: None,
            material_waste_kg: None,
        }
    }

    /// 建構器模式：設置停機時間
    pub fn with_downtime(mut self, minutes: f64) -> Self {
        self.downtime_minutes = minutes;
        self
    }

    /// 建構器模式：設置不良品數
    pub fn with_defects(mut self, defects: f64) -> Self {
        self.quality_defects = defects;
        self
    }

    /// 建構器模式：設置換線時間
    pub fn with_setup_time(mut self, minutes: f64) -> Self {
        self.setup_time_minutes = Some(minutes);
        self
    }

    /// 建構器模式：設置物料損耗
    pub fn with_material_waste(mut self, kg: f64) -> Self {
        self.material_waste_kg = Some(kg);
        self
    }

    /// 紀錄所屬日曆日
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// 時間戳欄位的序列化格式
///
/// 寫出固定使用 `%Y-%m-%d %H:%M:%S`；讀入額外容許 ISO `T` 分隔、
/// 無秒數與純日期形式。
pub mod timestamp_format {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{self, Deserialize, Deserializer, Serializer};

    const WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    const READ_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    pub fn serialize<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&timestamp.format(WRITE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse(&text).ok_or_else(|| serde::de::Error::custom(format!("無法解析時間戳: {text}")))
    }

    /// 依序嘗試支援的格式；純日期視為當日 00:00:00
    pub fn parse(text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        for format in READ_FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
                return Some(parsed);
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }
}
