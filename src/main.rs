use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use poe_market_prophet::analyzer::ChartWindow;
use poe_market_prophet::models::{RankingQuery, RankingResult};
use poe_market_prophet::storage::load_series;
use poe_market_prophet::{pipeline, rank_candidates, Config, Result};

#[derive(Parser, Debug)]
#[command(version, about = "Buy-day/sell-day ROI analysis over league price history")]
struct Args {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the daily price dataset from the league exports
    Process {
        /// Directory holding the *.csv exports; artifacts are written here too
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Skip the icon lookup service and use only the built-in icons
        #[arg(long)]
        no_icons: bool,
    },
    /// Rank items by return between a buy day and a sell day
    Rank {
        #[arg(long)]
        data_dir: Option<PathBuf>,

        #[arg(long, default_value_t = 3)]
        buy_day: u32,

        #[arg(long, default_value_t = 14)]
        sell_day: u32,

        /// Minimum buy price in chaos
        #[arg(long)]
        min_price: Option<f64>,

        /// Maximum buy price in chaos
        #[arg(long)]
        max_price: Option<f64>,

        /// Number of items to show (1-10)
        #[arg(long, default_value_t = 10)]
        count: usize,

        #[arg(long, default_value_t = 1)]
        chart_start: u32,

        #[arg(long, default_value_t = 30)]
        chart_end: u32,
    },
}

fn print_table(result: &RankingResult, query: &RankingQuery) {
    println!(
        "{:<40} {:>18} {:>18} {:>14}",
        "Item Name",
        format!("Buy Price (Day {})", query.buy_day),
        format!("Sell Price (Day {})", query.sell_day),
        "Predicted ROI"
    );

    if result.is_empty() {
        println!("No profitable items found for the selected criteria.");
        return;
    }

    for candidate in &result.candidates {
        println!(
            "{:<40} {:>18} {:>18} {:>14}",
            candidate.name,
            format!("{:.2}c", candidate.buy_price),
            format!("{:.2}c", candidate.sell_price),
            format!("{:.1}%", candidate.roi * 100.0)
        );
    }
}

fn print_chart(result: &RankingResult, window: ChartWindow) {
    println!();
    println!("Chart: Day {} - {}", window.start, window.end);
    for series in window.window_series(&result.chart_series) {
        let points: Vec<String> = series
            .values
            .iter()
            .map(|p| format!("{}:{:.2}", p.day, p.price))
            .collect();
        let last = series
            .last_point()
            .map(|p| format!("{:.2}c", p.price))
            .unwrap_or_else(|| "-".to_string());
        println!("  {} [{}] last {}", series.name, points.join(" "), last);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match args.command {
        Command::Process { data_dir, no_icons } => {
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            if no_icons {
                config.icons.enabled = false;
            }
            pipeline::run(&config).await?;
        }
        Command::Rank {
            data_dir,
            buy_day,
            sell_day,
            min_price,
            max_price,
            count,
            chart_start,
            chart_end,
        } => {
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            let dataset = load_series(&config.output_paths().raw_json).await?;
            let query = RankingQuery::new(buy_day, sell_day)
                .with_budget(min_price, max_price)
                .with_count(count);

            let result = rank_candidates(&dataset, &query);
            print_table(&result, &query);
            if !result.is_empty() {
                print_chart(&result, ChartWindow::new(chart_start, chart_end));
            }
        }
    }

    Ok(())
}
