#![allow(clippy::doc_markdown)]

mod cli;
mod tables;

use std::{collections::BTreeMap, io::stderr};

use cheapest_hours::{
    Options,
    PriceSeries,
    Quote,
    Selector,
    Summary,
    Upcoming,
    input::read_series,
    prelude::*,
};
use chrono::{DateTime, FixedOffset};
use clap::{Parser, crate_version};
use itertools::Itertools;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Args, Format},
    tables::{build_hours_table, build_snapshot_table, build_summary_table},
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_writer(stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    info!(version = crate_version!(), "starting…");

    run(&Args::parse())?;

    info!("done!");
    Ok(())
}

#[instrument(skip_all)]
fn run(args: &Args) -> Result {
    validate(args)?;
    let series = read_series(&args.prices_path)?;
    println!("{}", render(args, series)?);
    Ok(())
}

fn validate(args: &Args) -> Result {
    ensure!(args.max_count >= 1, "the maximum count must be positive");
    ensure!(
        (1..=args.max_count).contains(&args.upcoming_count),
        "the upcoming count must be within 1..={}",
        args.max_count,
    );
    if let Some(count) = args.count {
        ensure!(
            (1..=args.max_count).contains(&count),
            "the count must be within 1..={}",
            args.max_count,
        );
    }
    Ok(())
}

/// Calculate the cheapest hours and render them in the requested format.
fn render(args: &Args, series: PriceSeries) -> Result<String> {
    let summary = series.summary();
    let selector =
        Selector::with_options(series, Options::builder().max_count(args.max_count).build());

    let since = args.since();
    let snapshot = selector.calculate_cheapest_hours(since);
    let upcoming = snapshot.upcoming(args.upcoming_count, since)?;
    match upcoming {
        Some(upcoming) => info!(
            count = args.upcoming_count,
            start = %upcoming.start,
            price = %upcoming.price,
            is_active = upcoming.is_active,
            "upcoming"
        ),
        None => warn!(%since, "no prices left"),
    }

    let counts = args.counts();
    match args.format {
        Format::Table => {
            let mut tables = Vec::new();
            if let Some(summary) = summary {
                tables.push(build_summary_table(summary));
            }
            tables.push(build_snapshot_table(&snapshot, &counts, summary));
            if let Some(count) = args.count {
                tables.push(build_hours_table(&selector.get_cheapest_hours(count)?, summary));
            }
            Ok(tables.iter().join("\n"))
        }
        Format::Json => {
            let hours = counts
                .iter()
                .map(|count| -> Result<(usize, &[Quote])> { Ok((*count, snapshot.get(*count)?)) })
                .collect::<Result<_>>()?;
            let report = Report { since, summary, upcoming, hours };
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    since: DateTime<FixedOffset>,
    summary: Option<Summary>,
    upcoming: Option<Upcoming>,
    hours: BTreeMap<usize, &'a [Quote]>,
}
