//! stint - Analyze internship activity logs from local export files

use chrono::NaiveDate;
use clap::Parser;
use futures::StreamExt;
use stint::{
    aggregation::{self, PeriodAggregator, PeriodRange, Totals},
    cli::{Cli, Command, WeeklyArgs, parse_date_filter},
    data_loader::DataLoader,
    error::{Result, StintError},
    filters::RecordFilter,
    output::get_formatter,
    types::{ActivityRecord, ActivityStatus},
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the record filter from global CLI flags
fn build_filter(cli: &Cli) -> Result<RecordFilter> {
    let mut filter = RecordFilter::new();

    if let Some(since_str) = &cli.since {
        filter = filter.with_since(parse_date_filter(since_str)?);
    }
    if let Some(until_str) = &cli.until {
        filter = filter.with_until(parse_date_filter(until_str)?);
    }
    if let Some(status_str) = &cli.status {
        let status: ActivityStatus = status_str
            .parse()
            .map_err(StintError::InvalidArgument)?;
        filter = filter.with_status(status);
    }
    if let Some(tag) = &cli.tag {
        filter = filter.with_tag(tag.clone());
    }

    Ok(filter)
}

/// Load all records through the filter, propagating I/O failures
async fn collect_records(loader: &DataLoader, filter: RecordFilter) -> Result<Vec<ActivityRecord>> {
    let stream = filter.filter_stream(loader.load_records());
    tokio::pin!(stream);

    let mut records = Vec::new();
    while let Some(result) = stream.next().await {
        records.push(result?);
    }
    Ok(records)
}

/// Resolve the reporting period from flags, falling back to the record dates
///
/// With no flags and no dated records, the period collapses to today so the
/// report still renders as a single empty bucket.
fn resolve_range(
    records: &[ActivityRecord],
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> Result<PeriodRange> {
    let dates: Vec<NaiveDate> = records.iter().filter_map(|r| r.parsed_date()).collect();

    let start = match start {
        Some(s) => parse_date_filter(s)?,
        None => dates.iter().min().copied().unwrap_or(today),
    };
    let end = match end {
        Some(s) => parse_date_filter(s)?,
        None => dates.iter().max().copied().unwrap_or(today),
    };

    Ok(PeriodRange::new(start, end))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first to check for quiet flag
    let cli = Cli::parse();

    // Initialize logging. The --quiet flag should override RUST_LOG.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stint=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let record_filter = build_filter(&cli)?;
    let loader = DataLoader::new().await?;
    let records = collect_records(&loader, record_filter).await?;
    info!("Loaded {} activity records", records.len());

    let aggregator = PeriodAggregator::new();
    let command = cli
        .command
        .clone()
        .unwrap_or(Command::Weekly(WeeklyArgs::default()));

    match command {
        Command::Weekly(args) => {
            info!("Running weekly activity report");
            let range = resolve_range(
                &records,
                cli.start.as_deref(),
                cli.end.as_deref(),
                aggregator.today(),
            )?;
            let weeks = aggregator.bucket_by_week(&records, &range);
            let totals = Totals::from_week_buckets(&weeks);
            let formatter = get_formatter(cli.json, args.daily);
            println!("{}", formatter.format_weekly(&weeks, &totals));
        }
        Command::Monthly => {
            info!("Running monthly activity report");
            let range = resolve_range(
                &records,
                cli.start.as_deref(),
                cli.end.as_deref(),
                aggregator.today(),
            )?;
            let months = aggregator.bucket_by_month(&records, &range);
            let totals = Totals::from_month_buckets(&months);
            let formatter = get_formatter(cli.json, false);
            println!("{}", formatter.format_monthly(&months, &totals));
        }
        Command::Tags(args) => {
            info!("Running tag frequency report");
            let counts = aggregation::top_labels(aggregation::tally_tags(&records), args.top);
            let formatter = get_formatter(cli.json, false);
            println!("{}", formatter.format_labels("Tags", &counts));
        }
        Command::Tools(args) => {
            info!("Running skills/tools frequency report");
            let counts = aggregation::top_labels(aggregation::tally_tools(&records), args.top);
            let formatter = get_formatter(cli.json, false);
            println!("{}", formatter.format_labels("Skills & Tools", &counts));
        }
        Command::Summary => {
            info!("Running summary report");
            let totals = Totals::from_records(&records);
            let formatter = get_formatter(cli.json, false);
            println!("{}", formatter.format_summary(&totals));
        }
    }

    Ok(())
}
