//! 分組維度

use std::collections::BTreeMap;

use serde::Serialize;

use crate::metrics::EnrichedRecord;

/// 分組鍵維度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// 依機台
    MachineId,
    /// 依班別
    Shift,
    /// 依操作員
    OperatorId,
}

impl GroupBy {
    /// 取出該紀錄的分組鍵
    pub fn key(&self, record: &EnrichedRecord) -> String {
        match self {
            GroupBy::MachineId => record.base.machine_id.clone(),
            GroupBy::Shift => record.base.shift.to_string(),
            GroupBy::OperatorId => record.base.operator_id.clone(),
        }
    }
}

/// 聚合方式：整體彙總或依維度分組
///
/// 顯式標記變體，不以 Option 推斷；結果形狀（Overall / Grouped）
/// 跟著這個選擇走。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// 不分組，整體彙總
    Overall,
    /// 依指定維度分組
    By(GroupBy),
}

/// 依分組鍵切分視圖
///
/// BTreeMap 保證輸出鍵為字典序，分組順序因此具確定性。
pub fn partition<'a>(
    records: &[&'a EnrichedRecord],
    group_by: GroupBy,
) -> BTreeMap<String, Vec<&'a EnrichedRecord>> {
    let mut groups: BTreeMap<String, Vec<&EnrichedRecord>> = BTreeMap::new();
    for &record in records {
        groups.entry(group_by.key(record)).or_default().push(record);
    }
    groups
}
