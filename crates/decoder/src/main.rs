// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::Context;
use chronos_decoder::logging::{self, LoggingConfig};
use chronos_decoder::schema::{self, SchemaModel};
use chronos_decoder::store::DirectoryStore;
use chronos_decoder::{PipelineOptions, RawTrace, TraceDecodePipeline};
use chrono::{DateTime, Utc};
use config::{Args, Command, DecoderConfig, SchemaConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse_args();
    let config = DecoderConfig::from_env_file(&args.env_file)?;
    let _log_guard = logging::init_with_config(LoggingConfig::from(&config.log))?;
    tracing::debug!("Log level: {}", config.log.level);

    match args.command {
        Command::Decode {
            trace,
            block_num,
            block_time,
            schema_dir,
            pretty,
        } => decode(&config, &trace, block_num, &block_time, schema_dir, pretty).await,
        Command::Schema { file } => summarize_schema(&file).await,
    }
}

async fn decode(
    config: &DecoderConfig,
    trace: &Path,
    block_num: u32,
    block_time: &str,
    schema_dir: PathBuf,
    pretty: bool,
) -> anyhow::Result<()> {
    let block_time: DateTime<Utc> = DateTime::parse_from_rfc3339(block_time)
        .with_context(|| format!("Invalid block time '{}'", block_time))?
        .with_timezone(&Utc);
    let data = read_trace_bytes(trace).await?;
    let base = load_base(&config.schema).await?;

    tracing::info!(
        trace = %trace.display(),
        schema_dir = %schema_dir.display(),
        block_num,
        "Decoding trace"
    );

    let store = Arc::new(DirectoryStore::new(schema_dir));
    let pipeline = TraceDecodePipeline::new(store, base, PipelineOptions::from(config));
    let (result, summary) = pipeline
        .decode_trace_with_summary(&RawTrace {
            block_num,
            block_time,
            data,
        })
        .await?;

    tracing::info!(
        accounts = summary.accounts,
        accounts_resolved = summary.accounts_resolved,
        actions = summary.actions_attempted,
        decoded = summary.actions_decoded,
        "Trace decoded"
    );

    let output = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", output);
    Ok(())
}

async fn summarize_schema(file: &Path) -> anyhow::Result<()> {
    let blob = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let model = SchemaModel::from_blob(&blob)
        .with_context(|| format!("Invalid schema document {}", file.display()))?;

    println!("version:  {}", model.version());
    println!("aliases:  {}", model.alias_count());
    println!("structs:  {}", model.structs().len());
    println!("variants: {}", model.variant_count());
    println!("actions:  {}", model.action_count());
    println!("tables:   {}", model.tables().len());
    Ok(())
}

async fn load_base(config: &SchemaConfig) -> anyhow::Result<SchemaModel> {
    match &config.base_schema_path {
        Some(path) => {
            let document = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read base schema {}", path))?;
            Ok(schema::load_base_schema(&document)?)
        }
        None => Ok(schema::state_history_schema()?),
    }
}

/// Trace files hold either the raw bytes or their hex encoding.
async fn read_trace_bytes(path: &Path) -> anyhow::Result<Vec<u8>> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let text = std::str::from_utf8(&content).map(str::trim).unwrap_or_default();
    let is_hex = !text.is_empty()
        && text.len() % 2 == 0
        && text.bytes().all(|b| b.is_ascii_hexdigit());
    if is_hex {
        return Ok(hex::decode(text)?);
    }
    Ok(content)
}
