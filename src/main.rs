//! 製造 KPI 分析工具（命令列介面）

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use comfy_table::{ContentArrangement, Table};
use serde_json::Value;

use kpi_calc::{GroupBy, Grouping, KpiAnalyzer, Metric, TrendDimension};
use kpi_core::DateRange;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// 綜合報告
    Summary,
    /// OEE 彙總
    Oee,
    /// 效率彙總
    Efficiency,
    /// 產出彙總
    Throughput,
    /// 停機分析
    Downtime,
    /// 品質彙總
    Quality,
    /// 排名（機台與操作員）
    Top,
    /// 趨勢分析
    Trend,
    /// 機台比較
    Compare,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GroupDim {
    Machine,
    Shift,
    Operator,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TrendDim {
    Date,
    Machine,
    Shift,
    Operator,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFmt {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "kpi",
    about = "製造 KPI 分析工具",
    long_about = "讀取班次紀錄 CSV，計算效率 / OEE / 產出 / 停機 / 品質彙總，\
並提供排名、趨勢與機台比較查詢。"
)]
struct Args {
    /// 班次資料 CSV 路徑
    #[arg(long, default_value = "data/sample_data.csv")]
    data: PathBuf,

    /// 起日（YYYY-MM-DD）
    #[arg(long, requires = "end")]
    start: Option<NaiveDate>,

    /// 迄日（YYYY-MM-DD）
    #[arg(long, requires = "start")]
    end: Option<NaiveDate>,

    /// 分析模式
    #[arg(long, value_enum, default_value = "summary")]
    mode: Mode,

    /// 分組維度（五大 KPI 模式適用）
    #[arg(long, value_enum)]
    group_by: Option<GroupDim>,

    /// 指標名稱（top / trend / compare 模式適用）
    #[arg(long, default_value = "oee")]
    metric: String,

    /// 排名數量
    #[arg(long, default_value_t = 3)]
    top_n: usize,

    /// 趨勢分桶維度
    #[arg(long, value_enum, default_value = "date")]
    trend_by: TrendDim,

    /// 輸出格式
    #[arg(long, short = 'o', value_enum, default_value = "text")]
    output: OutputFmt,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> anyhow::Result<()> {
    let analyzer = KpiAnalyzer::from_path(&args.data)
        .with_context(|| format!("無法載入 {}", args.data.display()))?;

    let date_range = match (args.start, args.end) {
        (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
        _ => None,
    };
    let range = date_range.as_ref();

    let grouping = match args.group_by {
        None => Grouping::Overall,
        Some(GroupDim::Machine) => Grouping::By(GroupBy::MachineId),
        Some(GroupDim::Shift) => Grouping::By(GroupBy::Shift),
        Some(GroupDim::Operator) => Grouping::By(GroupBy::OperatorId),
    };
    let metric: Metric = args.metric.parse()?;
    let group_header = match args.group_by {
        Some(GroupDim::Machine) | None => "machine_id",
        Some(GroupDim::Shift) => "shift",
        Some(GroupDim::Operator) => "operator_id",
    };

    let value = match args.mode {
        Mode::Summary => serde_json::to_value(analyzer.summary_report(range)?)?,
        Mode::Oee => serde_json::to_value(analyzer.oee(grouping, range)?)?,
        Mode::Efficiency => serde_json::to_value(analyzer.efficiency(grouping, range)?)?,
        Mode::Throughput => serde_json::to_value(analyzer.throughput(grouping, range)?)?,
        Mode::Downtime => serde_json::to_value(analyzer.downtime(grouping, range)?)?,
        Mode::Quality => serde_json::to_value(analyzer.quality(grouping, range)?)?,
        Mode::Top => serde_json::to_value(analyzer.top_performers(metric, args.top_n)?)?,
        Mode::Trend => {
            let dimension = match args.trend_by {
                TrendDim::Date => TrendDimension::Date,
                TrendDim::Machine => TrendDimension::Machine,
                TrendDim::Shift => TrendDimension::Shift,
                TrendDim::Operator => TrendDimension::Operator,
            };
            serde_json::to_value(analyzer.trend(metric, dimension, range)?)?
        }
        Mode::Compare => serde_json::to_value(analyzer.machine_comparison(metric, range)?)?,
    };

    match args.output {
        OutputFmt::Json => println!("{}", serde_json::to_string_pretty(&value)?),
        OutputFmt::Text => {
            println!("===== KPI 分析結果 =====");
            match args.mode {
                Mode::Summary => print_sections(&value),
                Mode::Top => print_top(&value),
                Mode::Trend => print_trend(&value),
                Mode::Compare => print_rows("machine_id", &value),
                _ => {
                    if args.group_by.is_some() {
                        print_group_table(group_header, &value);
                    } else {
                        print_flat(&value);
                    }
                }
            }
        }
    }

    Ok(())
}

/// 純量值的顯示字串
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// 物件逐欄位列印
fn print_flat(value: &Value) {
    let Some(map) = value.as_object() else {
        return;
    };
    for (key, val) in map {
        println!("{key}: {}", scalar_to_string(val));
    }
}

/// 綜合報告逐區塊列印
fn print_sections(value: &Value) {
    let Some(map) = value.as_object() else {
        return;
    };
    for (section, content) in map {
        println!("\n--- {section} ---");
        if content.as_object().map(|o| o.values().all(|v| !v.is_object() && !v.is_array()))
            == Some(true)
        {
            print_flat(content);
        } else {
            // 巢狀區塊以緊湊 JSON 呈現
            println!("{content}");
        }
    }
}

/// 分組彙總列印為表格（鍵一欄、欄位各一欄）
fn print_group_table(key_header: &str, value: &Value) {
    let Some(groups) = value.as_object() else {
        return;
    };
    let columns: Vec<String> = groups
        .values()
        .next()
        .and_then(|v| v.as_object())
        .map(|object| object.keys().cloned().collect())
        .unwrap_or_default();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let mut header = vec![key_header.to_string()];
    header.extend(columns.iter().cloned());
    table.set_header(header);

    for (key, summary) in groups {
        let mut row = vec![key.clone()];
        if let Some(object) = summary.as_object() {
            row.extend(
                columns
                    .iter()
                    .map(|column| object.get(column).map(scalar_to_string).unwrap_or_default()),
            );
        }
        table.add_row(row);
    }
    println!("{table}");
}

/// 物件陣列列印為表格；id_column 排在首欄
fn print_rows(id_column: &str, value: &Value) {
    let Some(rows) = value.as_array() else {
        return;
    };
    let Some(first) = rows.first().and_then(|v| v.as_object()) else {
        return;
    };
    let mut columns: Vec<String> = vec![id_column.to_string()];
    columns.extend(first.keys().filter(|k| *k != id_column).cloned());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(columns.clone());
    for row in rows {
        if let Some(object) = row.as_object() {
            table.add_row(
                columns
                    .iter()
                    .map(|column| object.get(column).map(scalar_to_string).unwrap_or_default())
                    .collect::<Vec<_>>(),
            );
        }
    }
    println!("{table}");
}

/// 排名結果列印
fn print_top(value: &Value) {
    let Some(map) = value.as_object() else {
        return;
    };
    println!(
        "指標: {}（機台 {} 台 / 操作員 {} 人）",
        map.get("metric_analyzed").map(scalar_to_string).unwrap_or_default(),
        map.get("total_machines").map(scalar_to_string).unwrap_or_default(),
        map.get("total_operators").map(scalar_to_string).unwrap_or_default(),
    );
    if let Some(machines) = map.get("top_machines") {
        println!("\n機台排名:");
        print_rows("id", machines);
    }
    if let Some(operators) = map.get("top_operators") {
        println!("\n操作員排名:");
        print_rows("id", operators);
    }
}

/// 趨勢結果列印
fn print_trend(value: &Value) {
    let Some(map) = value.as_object() else {
        return;
    };
    for (key, val) in map {
        if key == "trend_data" {
            continue;
        }
        println!("{key}: {}", scalar_to_string(val));
    }
    if let Some(points) = map.get("trend_data") {
        println!();
        print_rows("period", points);
    }
}
