//! CSV 資料載入

use std::path::Path;

use crate::{KpiError, Result, ShiftRecord};

/// 必要欄位；缺一即屬 Schema 錯誤
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "timestamp",
    "machine_id",
    "operator_id",
    "shift",
    "target_production",
    "actual_production",
    "downtime_minutes",
    "quality_defects",
];

/// 從 CSV 檔載入班次紀錄
///
/// 先驗證表頭，再逐列解析；任何一列解析失敗（數值、時間戳或班別
/// 無法解析）都會使整個載入失敗。多餘的欄位會被忽略。
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<ShiftRecord>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| KpiError::DataLoad(format!("{}: {e}", path.display())))?;

    let headers = reader
        .headers()
        .map_err(|e| KpiError::DataLoad(e.to_string()))?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(KpiError::MissingColumn(column.to_string()));
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<ShiftRecord>() {
        records.push(row.map_err(|e| KpiError::DataLoad(e.to_string()))?);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "timestamp,machine_id,operator_id,shift,target_production,\
actual_production,downtime_minutes,quality_defects,setup_time_minutes,material_waste_kg";

    fn write_csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_records() {
        let file = write_csv(&[
            HEADER,
            "2026-07-06 06:00:00,A1,OP001,Morning,800,760,20,15,25,3.2",
            "2026-07-06 14:00:00,B1,OP002,Afternoon,680,650,35,8,30,4.1",
        ]);

        let records = load_records(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].machine_id, "A1");
        assert_eq!(records[0].target_production, 800.0);
        assert_eq!(records[1].shift, crate::Shift::Afternoon);
        assert_eq!(records[1].setup_time_minutes, Some(30.0));
    }

    #[test]
    fn test_load_without_optional_columns() {
        // 選配欄位缺席時照常載入
        let file = write_csv(&[
            "timestamp,machine_id,operator_id,shift,target_production,actual_production,downtime_minutes,quality_defects",
            "2026-07-06 06:00:00,A1,OP001,Morning,800,760,20,15",
        ]);

        let records = load_records(file.path()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].setup_time_minutes, None);
        assert_eq!(records[0].material_waste_kg, None);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let file = write_csv(&[
            "timestamp,machine_id,operator_id,shift,target_production,actual_production,downtime_minutes",
            "2026-07-06 06:00:00,A1,OP001,Morning,800,760,20",
        ]);

        let error = load_records(file.path()).unwrap_err();

        assert!(matches!(error, KpiError::MissingColumn(column) if column == "quality_defects"));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let error = load_records("no/such/file.csv").unwrap_err();
        assert!(matches!(error, KpiError::DataLoad(_)));
    }

    #[test]
    fn test_bad_row_is_load_error() {
        let file = write_csv(&[
            HEADER,
            "2026-07-06 06:00:00,A1,OP001,Morning,not-a-number,760,20,15,25,3.2",
        ]);

        assert!(matches!(
            load_records(file.path()).unwrap_err(),
            KpiError::DataLoad(_)
        ));
    }

    #[test]
    fn test_unknown_shift_is_load_error() {
        let file = write_csv(&[
            HEADER,
            "2026-07-06 06:00:00,A1,OP001,Weekend,800,760,20,15,25,3.2",
        ]);

        assert!(matches!(
            load_records(file.path()).unwrap_err(),
            KpiError::DataLoad(_)
        ));
    }
}
