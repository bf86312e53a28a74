pub mod address;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod numeric;
pub mod render;
pub mod resolve;
pub mod series;
pub mod service;
pub mod sheet;
pub mod source;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};
use serde_json::json;

use crate::{
    cli::{Cli, Commands, OutputFormat},
    config::Config,
    series::SumColumns,
    service::SheetService,
    source::{FileSource, HttpSource, SheetSource},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sheetfeed", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub async fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Series(args) => handle_series(&args).await,
        Commands::Cells(args) => handle_cells(&args).await,
        Commands::Range(args) => handle_range(&args).await,
    }
}

async fn handle_series(args: &cli::SeriesArgs) -> Result<()> {
    let mut config = build_config(&args.source);
    if let Some(hint) = &args.category_column {
        config.category_column = Some(hint.clone());
    }
    if let Some(hint) = &args.value_column {
        config.value_column = Some(hint.clone());
    }
    if let Some(raw) = &args.sum_columns {
        config.sum_columns = SumColumns::parse(raw);
    }
    if let Some(ttl) = args.cache_ttl {
        config.cache_ttl_seconds = ttl;
    }

    let service = build_service(&args.source, config);
    let series = service.series().await;

    match args.source.format {
        OutputFormat::Json => {
            let payload = json!({ "data": series });
            println!("{}", serde_json::to_string(&payload)?);
        }
        OutputFormat::Table => {
            let headers = vec!["category".to_string(), "value".to_string()];
            let rows = series
                .iter()
                .map(|point| vec![point.category.clone(), render::format_number(point.value)])
                .collect::<Vec<_>>();
            render::print_table(&headers, &rows);
        }
    }
    info!("Emitted {} series point(s)", series.len());
    Ok(())
}

async fn handle_cells(args: &cli::CellsArgs) -> Result<()> {
    let config = build_config(&args.source);
    let service = build_service(&args.source, config);
    let cells = service
        .cells(&args.cells)
        .await
        .context("Looking up sheet cells")?;

    match args.source.format {
        OutputFormat::Json => {
            // serde_json's preserve_order keeps the envelope in request order.
            let mut entries = serde_json::Map::new();
            for (reference, value) in &cells {
                entries.insert(reference.clone(), serde_json::to_value(value)?);
            }
            let payload = json!({ "cells": entries });
            println!("{}", serde_json::to_string(&payload)?);
        }
        OutputFormat::Table => {
            let headers = vec!["cell".to_string(), "value".to_string()];
            let rows = cells
                .iter()
                .map(|(reference, value)| {
                    vec![reference.clone(), value.clone().unwrap_or_default()]
                })
                .collect::<Vec<_>>();
            render::print_table(&headers, &rows);
        }
    }
    info!("Looked up {} cell reference(s)", args.cells.len());
    Ok(())
}

async fn handle_range(args: &cli::RangeArgs) -> Result<()> {
    let config = build_config(&args.source);
    let service = build_service(&args.source, config);
    let range = service
        .range(&args.start, &args.end)
        .await
        .with_context(|| format!("Reading range {}:{}", args.start, args.end))?;

    match args.source.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&range)?);
        }
        OutputFormat::Table => {
            render::print_table(&range.headers, &range.rows);
        }
    }
    info!(
        "Read {} row(s) across {} column(s)",
        range.rows.len(),
        range.headers.len()
    );
    Ok(())
}

fn build_config(args: &cli::SourceArgs) -> Config {
    let mut config = Config::from_env();
    if let Some(url) = &args.url {
        config.csv_url = Some(url.clone());
    }
    if let Some(row) = args.header_row {
        config.header_row = Some(row);
    }
    config
}

fn build_service(args: &cli::SourceArgs, config: Config) -> SheetService<SheetSource> {
    let source = if let Some(path) = &args.input {
        Some(SheetSource::File(FileSource::new(path)))
    } else {
        config
            .resolved_url()
            .map(|url| SheetSource::Http(HttpSource::new(url)))
    };
    SheetService::new(source, config)
}
