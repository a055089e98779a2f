use chrono::{Duration, TimeZone, Utc};
use signalboard::config::InstrumentConfig;
use signalboard::data::{BarSeries, CsvDataSource, FetchRequest, MarketDataSource, AUTO_INTERVAL};
use signalboard::engines::{InstrumentStatus, Scanner, SignalEngine};
use signalboard::types::Signal;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn zigzag_up(len: usize) -> Vec<f64> {
    let mut closes = vec![2000.0];
    for i in 0..len - 1 {
        let step = if i % 2 == 0 { 2.0 } else { -1.5 };
        closes.push(closes[i] + step);
    }
    closes
}

/// Two-level export layout: a Price/Close/... header, then Ticker and Date rows.
fn write_multilevel_csv(path: &Path, ticker: &str, closes: &[f64]) {
    let start = Utc.with_ymd_and_hms(2024, 3, 4, 14, 30, 0).unwrap();
    let mut text = String::from("Price,Close,High,Low,Open,Volume\n");
    text.push_str(&format!("Ticker,{t},{t},{t},{t},{t}\n", t = ticker));
    text.push_str("Date,,,,,\n");
    for (i, close) in closes.iter().enumerate() {
        let ts = start + Duration::minutes(15 * i as i64);
        text.push_str(&format!(
            "{},{close},{},{},{close},1000\n",
            ts.format("%Y-%m-%d %H:%M:%S+00:00"),
            close + 0.5,
            close - 0.5,
        ));
    }
    fs::write(path, text).unwrap();
}

#[test]
fn test_multilevel_csv_loads_into_series() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("GC_F_15m.csv");
    write_multilevel_csv(&path, "GC=F", &zigzag_up(20));

    let source = CsvDataSource::new(Some(dir.path().to_path_buf()));
    let frame = source.fetch(&FetchRequest::new("GC=F", "15m", "5d")).unwrap();
    let series = BarSeries::from_frame("GC=F", "15m", &frame).unwrap();

    assert_eq!(series.len(), 20);
    assert_eq!(series.closes()[0], 2000.0);
    assert_eq!(
        series.bars()[1].timestamp,
        Utc.with_ymd_and_hms(2024, 3, 4, 14, 45, 0).unwrap()
    );
}

#[test]
fn test_scan_mixed_watchlist() {
    let dir = tempdir().unwrap();
    write_multilevel_csv(&dir.path().join("GC_F_15m.csv"), "GC=F", &zigzag_up(40));
    write_multilevel_csv(&dir.path().join("_GSPC_15m.csv"), "^GSPC", &zigzag_up(5));

    let mut gold = InstrumentConfig::new("GC=F");
    gold.name = Some("Gold".to_string());
    let watchlist = vec![
        gold,
        InstrumentConfig::new("^GSPC"),
        InstrumentConfig::new("BTC-USD"),
    ];

    let scanner = Scanner::new(CsvDataSource::new(Some(dir.path().to_path_buf())), SignalEngine::default());
    let results = scanner.scan(&watchlist);
    assert_eq!(results.len(), 3);

    assert_eq!(results[0].name, "Gold");
    let report = results[0].report().expect("gold should evaluate");
    assert_eq!(report.signal, Signal::Buy);
    assert_eq!(report.series.len(), 40 - 14);

    // Short history and missing file are both "no data", not failures.
    assert!(matches!(results[1].status, InstrumentStatus::NoData(_)));
    assert!(matches!(results[2].status, InstrumentStatus::NoData(_)));
}

#[test]
fn test_explicit_path_overrides_naming() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gold export.csv");
    write_multilevel_csv(&path, "GC=F", &zigzag_up(30));

    let mut instrument = InstrumentConfig::new("GC=F");
    instrument.path = Some(path);
    instrument.interval = AUTO_INTERVAL.to_string();
    let result = Scanner::new(CsvDataSource::new(None), SignalEngine::default()).evaluate(&instrument);
    assert!(result.report().is_some());
    assert_eq!(result.interval, "15m");
}

#[test]
fn test_bad_row_in_file_is_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("GC_F_15m.csv");
    write_multilevel_csv(&path, "GC=F", &zigzag_up(30));

    // Corrupt one bar: low above high.
    let text = fs::read_to_string(&path).unwrap();
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let mut fields: Vec<String> = lines[6].split(',').map(str::to_string).collect();
    let high: f64 = fields[2].parse().unwrap();
    fields[3] = (high + 1.0).to_string();
    lines[6] = fields.join(",");
    fs::write(&path, lines.join("\n") + "\n").unwrap();

    let scanner = Scanner::new(CsvDataSource::new(Some(dir.path().to_path_buf())), SignalEngine::default());
    let result = scanner.evaluate(&InstrumentConfig::new("GC=F"));
    let report = result.report().expect("one bad bar must not fail the instrument");
    assert_eq!(report.series.len(), 29 - 14);
}
