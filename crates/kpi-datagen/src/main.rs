//! 模擬資料生成工具

use std::path::PathBuf;

use anyhow::Context;
use chrono::{Duration, Local, NaiveDate};
use clap::Parser;
use kpi_datagen::{generate, write_csv, GeneratorConfig};

#[derive(Parser, Debug)]
#[command(name = "kpi-datagen", about = "生成模擬製造班次資料")]
struct Args {
    /// 生成天數
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// 起始日期（YYYY-MM-DD；未指定時回推 days 天）
    #[arg(long)]
    start: Option<NaiveDate>,

    /// 隨機種子
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// 連週末一併生成（預設僅工作日）
    #[arg(long, default_value_t = false)]
    include_weekends: bool,

    /// 輸出 CSV 路徑
    #[arg(long, short = 'o', default_value = "data/sample_data.csv")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let start_date = args
        .start
        .unwrap_or_else(|| Local::now().date_naive() - Duration::days(i64::from(args.days)));

    let config = GeneratorConfig::new(args.days, start_date)
        .with_seed(args.seed)
        .with_skip_weekends(!args.include_weekends);
    let records = generate(&config);

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("無法建立目錄 {}", parent.display()))?;
        }
    }
    write_csv(&args.output, &records)
        .with_context(|| format!("無法寫出 {}", args.output.display()))?;

    // 資料概況
    let total_target: f64 = records.iter().map(|r| r.target_production).sum();
    let total_actual: f64 = records.iter().map(|r| r.actual_production).sum();
    let total_downtime: f64 = records.iter().map(|r| r.downtime_minutes).sum();
    let total_defects: f64 = records.iter().map(|r| r.quality_defects).sum();

    println!("===== 模擬資料概況 =====");
    println!("紀錄筆數: {}", records.len());
    if let (Some(first), Some(last)) = (records.first(), records.last()) {
        println!("日期範圍: {} ~ {}", first.timestamp.date(), last.timestamp.date());
    }
    println!("目標產量總和: {total_target}");
    println!("實際產量總和: {total_actual}");
    println!("停機分鐘總和: {total_downtime}");
    println!("不良品總數: {total_defects}");
    if total_target > 0.0 {
        println!("整體效率: {:.1}%", total_actual / total_target * 100.0);
    }
    println!("輸出檔案: {}", args.output.display());

    Ok(())
}
