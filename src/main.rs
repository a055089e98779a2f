use clap::Parser;
use signalboard::config::{ConfigManager, InstrumentConfig};
use signalboard::data::{CsvDataSource, AUTO_INTERVAL};
use signalboard::engines::{AlertEmitter, InstrumentStatus, LogAlertSink, Scanner, SignalEngine};
use signalboard::view::{ChartFrame, ViewState};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "EMA/RSI signal board for a watchlist or a single CSV file")]
struct Args {
    /// Configuration file (TOML or JSON); SIGNALBOARD__* env vars override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print chart frames as one JSON array instead of summary lines
    #[arg(long)]
    json: bool,

    /// Bar interval label for CSV_FILE; detected from bar spacing if omitted
    #[arg(long, requires = "csv_file")]
    interval: Option<String>,

    /// Evaluate this CSV file instead of the configured watchlist
    #[arg(requires = "symbol")]
    csv_file: Option<PathBuf>,

    /// Symbol shown for CSV_FILE
    symbol: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let manager = ConfigManager::new();
    if let Err(err) = manager.load(args.config.as_deref()) {
        log::error!("{err}");
        return ExitCode::from(2);
    }
    let config = manager.get();

    let instruments = match (args.csv_file, args.symbol) {
        (Some(path), Some(symbol)) => {
            let mut instrument = InstrumentConfig::new(&symbol);
            instrument.interval = args.interval.unwrap_or_else(|| AUTO_INTERVAL.to_string());
            instrument.period = "max".to_string();
            instrument.path = Some(path);
            vec![instrument]
        }
        _ => config.watchlist.instruments.clone(),
    };
    if instruments.is_empty() {
        log::warn!("No instruments configured");
        return ExitCode::SUCCESS;
    }

    let source = CsvDataSource::new(config.watchlist.data_dir.clone());
    let scanner = Scanner::new(source, SignalEngine::from_config(&config));
    let mut emitter = AlertEmitter::new(config.alerts.clone());
    let view = ViewState::new(config.view.clone());

    let mut frames = Vec::new();
    for entry in scanner.scan(&instruments) {
        match &entry.status {
            InstrumentStatus::Ready(report) => {
                emitter.dispatch(report, &LogAlertSink);
                if args.json {
                    frames.push(ChartFrame::build(report, &view));
                } else {
                    println!("{report}");
                }
            }
            // Already logged by the scanner; keep stdout valid JSON.
            InstrumentStatus::NoData(_) if args.json => {}
            InstrumentStatus::NoData(reason) => {
                println!("{:<10} {:>4} no data: {reason}", entry.name, entry.interval);
            }
            InstrumentStatus::Failed(reason) => {
                log::error!("{} ({}): {reason}", entry.symbol, entry.interval);
            }
        }
    }

    if args.json {
        match serde_json::to_string_pretty(&frames) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("{err}"),
        }
    }

    ExitCode::SUCCESS
}
