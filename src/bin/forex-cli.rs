use anyhow::{Result, anyhow};
use chrono::DateTime;
use clap::Parser;
use colored::Colorize;
use dotenvy::dotenv;

use quant_back_end::cli_utils::formatting::{format_candle_time, format_json, format_price, print_header};
use quant_back_end::cli_utils::{format_table, print_info, print_warning};
use quant_back_end::forex::config::ForexConfig;
use quant_back_end::forex::data_source::ForexDataSource;
use quant_back_end::forex::plan::{KNOWN_PAIRS, PlanNotice};

#[derive(Parser, Debug)]
#[command(
    name = "forex-cli",
    about = "Fetch forex candles from Tiingo",
    long_about = "Fetches candles for a currency pair. Weekly (1W) and monthly (1M) candles are built from daily bars"
)]
struct CliArgs {
    /// Currency pair, e.g. EURUSD
    #[arg(long, default_value = "EURUSD")]
    symbol: String,

    /// 1m, 5m, 15m, 30m, 1H, 4H, 1D, 1W or 1M
    #[arg(long, default_value = "1D")]
    timeframe: String,

    /// Number of candles to return
    #[arg(long, default_value_t = 20)]
    limit: u32,

    /// End of the window, as unix seconds or RFC 3339
    #[arg(long)]
    before: Option<String>,

    /// Print raw JSON instead of a table
    #[arg(long)]
    json: bool,

    /// List the pairs known to the provider and exit
    #[arg(long)]
    pairs: bool,

    #[command(flatten)]
    forex: ForexConfig,
}

fn parse_before(raw: &str) -> Result<i64> {
    if let Ok(ts) = raw.parse::<i64>() {
        return Ok(ts);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.timestamp())
        .map_err(|e| anyhow!("Invalid --before {}: {}", raw, e))
}

fn describe_notice(notice: &PlanNotice) -> String {
    match notice {
        PlanNotice::PeriodCountClamped { requested, max } => {
            format!("Requested {} periods, clamped to {}", requested, max)
        }
        PlanNotice::HistoryWindowClamped { max_days } => {
            format!("History window clamped to {} days", max_days)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    if args.pairs {
        print_header("Known pairs");
        for pair in KNOWN_PAIRS {
            println!("  {}", pair);
        }
        return Ok(());
    }

    let before_time = args.before.as_deref().map(parse_before).transpose()?;
    let source = ForexDataSource::from_config(&args.forex)?;

    let result = source
        .get_kline(&args.symbol, &args.timeframe, args.limit, before_time)
        .await;

    for notice in &result.notices {
        print_warning(&describe_notice(notice));
    }

    if args.json {
        println!("{}", format_json(&result));
        return Ok(());
    }

    print_header(&format!("{} {}", args.symbol.to_uppercase(), args.timeframe));

    if result.candles.is_empty() {
        print_info("No candles returned");
        return Ok(());
    }

    let rows = result
        .candles
        .iter()
        .map(|c| {
            vec![
                format_candle_time(c.timestamp),
                format_price(c.open),
                format_price(c.high),
                format_price(c.low),
                format_price(c.close),
            ]
        })
        .collect();

    format_table(vec!["time", "open", "high", "low", "close"], rows);
    eprintln!();
    eprintln!("{}", format!("{} candles", result.candles.len()).bright_cyan());

    Ok(())
}
