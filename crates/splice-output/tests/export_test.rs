//! Export of engine-built tables.

use chrono::NaiveDate;
use splice_data::{DailyBar, DailySeries, Frame, NumericColumn, StatementKind, StatementTable};
use splice_engine::{EngineConfig, FusedDailyTable, RatioSet, fuse};
use splice_output::{ExportFormat, Exporter, to_dataframe};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn built_table() -> FusedDailyTable {
    let quarters = vec![ymd(2020, 1, 8), ymd(2020, 4, 8)];
    let cash_flow = StatementTable {
        kind: StatementKind::CashFlow,
        frame: Frame::with_columns(
            quarters,
            vec![
                NumericColumn::new("Operating Cash Flow", vec![Some(200.0), Some(0.0)]),
                NumericColumn::new("Revenue", vec![Some(1000.0), Some(1100.0)]),
            ],
        )
        .unwrap(),
    };
    let fused = fuse(&[cash_flow]).unwrap();
    let daily = DailySeries::new(
        [
            (ymd(2020, 1, 1), 10.0),
            (ymd(2020, 1, 8), 11.0),
            (ymd(2020, 4, 9), 12.0),
        ]
        .into_iter()
        .map(|(date, close)| DailyBar {
            date,
            close: Some(close),
            volume: Some(100.0),
        })
        .collect(),
    );
    let config = EngineConfig {
        ratios: RatioSet::new(Vec::new()),
        ..EngineConfig::default()
    };
    FusedDailyTable::build(fused, &daily, &config).unwrap()
}

#[test]
fn test_engine_table_to_csv() {
    let csv = built_table().export_to_string(ExportFormat::Csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Date,Close,Volume,Operating Cash Flow,Revenue,Present Value of Future Cash Flows,Operating Cash Flow Pct Change,Revenue Pct Change",
            "2020-01-01,10,100,,,N/A,,",
            "2020-01-08,11,100,200,1000,10049.999999999998,,",
            "2020-04-09,12,100,0,1100,0,-1,0.1",
        ]
    );
}

#[test]
fn test_dataframe_matches_csv_columns() {
    let table = built_table();
    let df = to_dataframe(&table).unwrap();
    let csv = table.export_to_string(ExportFormat::Csv).unwrap();
    let header: Vec<&str> = csv.lines().next().unwrap().split(',').collect();

    assert_eq!(df.get_column_names_str(), header);
    assert_eq!(df.height(), table.height());
}

#[test]
fn test_csv_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    built_table().export_to_file(&first, ExportFormat::Csv).unwrap();
    built_table().export_to_file(&second, ExportFormat::Csv).unwrap();

    assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
}
