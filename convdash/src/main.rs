//! # convdash
//!
//! A CLI for booking conversion reporting: pivots, drill-downs and CSV export.
//!
//! ## Overview
//!
//! convdash is built on top of convdashlib. It loads a CSV export of booking
//! records for a date range, classifies every booking, applies facet filters,
//! and prints one of the dashboard's pivots or the bookings behind one cell.
//!
//! ## Features
//!
//! - **Six views**: Service, person and source conversion, cancelled and
//!   other non-conversions, follow-ups
//! - **Facet filters**: `--city`, `--vehicle-type`, `--service`,
//!   `--service-type`, `--person`, `--source` (repeatable)
//! - **Date ranges**: `--from`/`--to` within the lookback window, or `--period`
//! - **Multiple output formats**: Table (default), JSON, CSV
//!
//! ## Usage
//!
//! ```bash
//! # Service conversion pivot for this month
//! convdash pivot bookings.csv --view service --period this-month
//!
//! # Only Chennai bookings, as CSV
//! convdash pivot bookings.csv --view person --city Chennai --output csv
//!
//! # Bookings behind the Wash / Goaxled cell
//! convdash drill bookings.csv --view service --row Wash --column Goaxled
//!
//! # Every booking in the filtered set
//! convdash drill bookings.csv --view service --row "Grand Total" --column "Grand Total"
//!
//! # Available facet values
//! convdash facets bookings.csv
//! ```
//!
//! Logging goes to stderr and is controlled by `CONVDASH_LOG`
//! (e.g. `CONVDASH_LOG=convdashlib=debug`).

mod render;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Arg, ArgAction, ArgMatches, Command};
use convdashlib::drilldown::{CellRef, DrilldownOptions, DrilldownOutcome, GrandTotalScope};
use convdashlib::output::{to_delimited, write_delimited, ColumnLabels, Table};
use convdashlib::query::{ColumnKey, Facet, FacetFilter, PivotResult, PivotView, RowKey};
use convdashlib::source::{
    load_dataset, CsvSource, DateRange, Period, SourceOptions, DEFAULT_LOOKBACK_DAYS,
};
use convdashlib::Session;
use serde::Serialize;

const DEFAULT_LOG_FILTER: &str = "convdash=warn,convdashlib=warn";

/// Output format selected with `--output`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Table,
    Json,
    Csv,
}

impl OutputMode {
    fn from_matches(matches: &ArgMatches) -> Self {
        match matches.get_one::<String>("output").map(String::as_str) {
            Some("json") => OutputMode::Json,
            Some("csv") => OutputMode::Csv,
            _ => OutputMode::Table,
        }
    }
}

/// JSON body of `pivot`
#[derive(Debug, Serialize)]
struct PivotReport<'a> {
    view: PivotView,
    title: &'a str,
    table_id: String,
    range: &'a DateRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<&'a str>,
    pivot: &'a PivotResult,
}

/// JSON body of `drill`
#[derive(Debug, Serialize)]
struct DrillReport<'a> {
    view: PivotView,
    cell: &'a CellRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(flatten)]
    outcome: &'a DrilldownOutcome,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}' (expected YYYY-MM-DD): {}", value, e))
}

/// Arguments shared by every subcommand: input, date range, facets
fn data_args(cmd: Command) -> Command {
    let cmd = cmd
        .arg(
            Arg::new("file")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("CSV export of booking records"),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .value_parser(parse_date)
                .conflicts_with("period")
                .help("First booking date (YYYY-MM-DD)"),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .value_parser(parse_date)
                .requires("from")
                .help("Last booking date (YYYY-MM-DD, defaults to today)"),
        )
        .arg(
            Arg::new("period")
                .short('p')
                .long("period")
                .value_parser(Period::ALL.map(|p| p.name()))
                .help("Quick date range relative to today"),
        )
        .arg(
            Arg::new("today")
                .long("today")
                .value_parser(parse_date)
                .help("Reference date instead of the system date"),
        )
        .arg(
            Arg::new("lookback-days")
                .long("lookback-days")
                .value_parser(clap::value_parser!(i64).range(0..))
                .help(format!(
                    "How many days back a date range may reach [default: {DEFAULT_LOOKBACK_DAYS}]"
                )),
        );

    Facet::ALL.into_iter().fold(cmd, |cmd, facet| {
        cmd.arg(
            Arg::new(facet.name())
                .long(facet.name())
                .action(ArgAction::Append)
                .help(format!("Keep only this {} (can be specified multiple times)", facet.name())),
        )
    })
}

fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_parser(["table", "json", "csv"])
        .default_value("table")
        .help("Output format")
}

fn view_arg() -> Arg {
    Arg::new("view")
        .short('v')
        .long("view")
        .required(true)
        .value_parser(PivotView::ALL.map(|v| v.name()))
        .help("Pivot to build")
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("convdash")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Booking conversion pivots and drill-downs")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            data_args(Command::new("pivot").about("Print one of the dashboard pivots"))
                .arg(view_arg())
                .arg(output_arg())
                .arg(
                    Arg::new("export")
                        .long("export")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Also write the pivot as CSV into this directory"),
                ),
        )
        .subcommand(
            data_args(Command::new("drill").about("List the bookings behind one pivot cell"))
                .arg(view_arg())
                .arg(output_arg())
                .arg(
                    Arg::new("row")
                        .short('r')
                        .long("row")
                        .required(true)
                        .action(ArgAction::Append)
                        .help("Row key, one value per index field; \"Grand Total\" for the total row"),
                )
                .arg(
                    Arg::new("column")
                        .short('c')
                        .long("column")
                        .required(true)
                        .help("Column category, or \"Grand Total\""),
                )
                .arg(
                    Arg::new("conflate-grand-total")
                        .long("conflate-grand-total")
                        .action(ArgAction::SetTrue)
                        .help("A Grand Total row or column drops both row and column filters"),
                )
                .arg(
                    Arg::new("export")
                        .long("export")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Also write the detail rows as CSV to this file"),
                ),
        )
        .subcommand(
            data_args(Command::new("facets").about("List the values available for each facet"))
                .arg(output_arg()),
        )
}

/// Resolve the reporting range from --from/--to/--period
fn build_range(matches: &ArgMatches, today: NaiveDate, lookback_days: i64) -> anyhow::Result<DateRange> {
    if let Some(from) = matches.get_one::<NaiveDate>("from") {
        let to = matches.get_one::<NaiveDate>("to").copied().unwrap_or(today);
        return Ok(DateRange::custom(*from, to, today, lookback_days)?);
    }
    if let Some(period) = matches.get_one::<String>("period") {
        let period: Period = period.parse()?;
        return Ok(period.range(today, lookback_days));
    }
    Ok(DateRange::lookback(today, lookback_days))
}

/// Build facet filter from matches
fn build_facets(matches: &ArgMatches) -> FacetFilter {
    Facet::ALL
        .into_iter()
        .fold(FacetFilter::new(), |filter, facet| match matches.get_many::<String>(facet.name()) {
            Some(values) => filter.select(facet, values.cloned()),
            None => filter,
        })
}

/// Load, classify and filter the records named on the command line
fn open_session(matches: &ArgMatches) -> anyhow::Result<Session> {
    let path = matches
        .get_one::<PathBuf>("file")
        .context("missing input file")?;
    let today = matches
        .get_one::<NaiveDate>("today")
        .copied()
        .unwrap_or_else(|| Local::now().date_naive());
    let lookback_days = matches
        .get_one::<i64>("lookback-days")
        .copied()
        .unwrap_or(DEFAULT_LOOKBACK_DAYS);

    let options = SourceOptions::new().lookback_days(lookback_days);
    let range = build_range(matches, today, options.lookback_days)?;
    tracing::debug!(file = %path.display(), range = %range, "opening records");
    let mut source = CsvSource::new(path);
    let dataset = load_dataset(&mut source, range, &options);

    let mut session = Session::new(dataset);
    session.set_facets(build_facets(matches));
    Ok(session)
}

fn selected_view(matches: &ArgMatches) -> anyhow::Result<PivotView> {
    let name = matches
        .get_one::<String>("view")
        .context("missing --view")?;
    Ok(name.parse()?)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn export_table(table: &Table, labels: &ColumnLabels, path: &Path) -> anyhow::Result<()> {
    write_delimited(table, labels, path)
        .with_context(|| format!("failed to export to '{}'", path.display()))?;
    eprintln!("Exported {}", path.display());
    Ok(())
}

/// Handler for pivot command
fn pivot_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let view = selected_view(matches)?;
    let session = open_session(matches)?;
    let pivot = session.pivot(view);
    let spec = view.spec();
    let table = Table::from_pivot(&pivot).title(view.title());
    let labels = ColumnLabels::pivot();

    if let Some(dir) = matches.get_one::<PathBuf>("export") {
        export_table(&table, &labels, &dir.join(view.export_file_name()))?;
    }

    match OutputMode::from_matches(matches) {
        OutputMode::Json => print_json(&PivotReport {
            view,
            title: view.title(),
            table_id: spec.table_id(),
            range: session.range(),
            notice: session.notice(),
            pivot: &pivot,
        }),
        OutputMode::Csv => {
            print!("{}", to_delimited(&table, &labels)?);
            Ok(())
        }
        OutputMode::Table => {
            if let Some(notice) = session.notice() {
                print!("{}", render::render_notice(notice));
            } else {
                print!("{}", render::render_table(&table, &labels));
            }
            Ok(())
        }
    }
}

/// Handler for drill command
fn drill_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let view = selected_view(matches)?;
    let session = open_session(matches)?;

    let row = RowKey::from_values(
        matches
            .get_many::<String>("row")
            .context("missing --row")?
            .cloned(),
    );
    let column = ColumnKey::parse(
        matches
            .get_one::<String>("column")
            .context("missing --column")?,
    );
    let scope = if matches.get_flag("conflate-grand-total") {
        GrandTotalScope::Conflated
    } else {
        GrandTotalScope::PerAxis
    };
    let options = DrilldownOptions::new().grand_total_scope(scope);

    let pivot = session.pivot(view);
    let cell = CellRef::from_pivot(&pivot, row, column);
    let outcome = session.drilldown(view, &cell, &options);
    let labels = ColumnLabels::details();

    let table = match &outcome {
        DrilldownOutcome::Rows(rows) => Some(
            rows.to_table()
                .title(&format!("{}: {} / {}", view.title(), cell.row, cell.column.id())),
        ),
        _ => None,
    };

    if let (Some(path), Some(table)) = (matches.get_one::<PathBuf>("export"), &table) {
        export_table(table, &labels, path)?;
    }

    match OutputMode::from_matches(matches) {
        OutputMode::Json => print_json(&DrillReport {
            view,
            cell: &cell,
            message: outcome.message(),
            outcome: &outcome,
        }),
        OutputMode::Csv => {
            match (&table, outcome.message()) {
                (Some(table), _) => print!("{}", to_delimited(table, &labels)?),
                (None, Some(message)) => println!("{}", message),
                (None, None) => {}
            }
            Ok(())
        }
        OutputMode::Table => {
            match (&table, outcome.message()) {
                (Some(table), _) => print!("{}", render::render_table(table, &labels)),
                (None, Some(message)) => print!("{}", render::render_notice(message)),
                (None, None) => {}
            }
            Ok(())
        }
    }
}

/// Handler for facets command
fn facets_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let session = open_session(matches)?;
    let options = session.facet_options();

    match OutputMode::from_matches(matches) {
        OutputMode::Json => {
            let by_name: BTreeMap<&str, &Vec<String>> =
                options.iter().map(|(f, v)| (f.name(), v)).collect();
            print_json(&by_name)
        }
        OutputMode::Csv => {
            let mut table = Table::new(vec!["facet".to_string(), "value".to_string()]);
            for (facet, values) in &options {
                for value in values {
                    table.push_row(vec![facet.name().to_string(), value.clone()]);
                }
            }
            print!("{}", to_delimited(&table, &ColumnLabels::new())?);
            Ok(())
        }
        OutputMode::Table => {
            if let Some(notice) = session.notice() {
                print!("{}", render::render_notice(notice));
            } else {
                print!("{}", render::render_facets(&options));
            }
            Ok(())
        }
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("CONVDASH_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

fn main() -> ExitCode {
    init_logging();
    let matches = build_command().get_matches();

    let result = match matches.subcommand() {
        Some(("pivot", sub)) => pivot_handler(sub),
        Some(("drill", sub)) => drill_handler(sub),
        Some(("facets", sub)) => facets_handler(sub),
        _ => Err(anyhow::anyhow!("unknown command")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
