//! Command implementations for the InfoBase CLI.

use std::fs;
use std::time::{Duration, Instant};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::IngestConfig;
use crate::dataset::csv::{CsvDatasetReader, LabelColumn};
use crate::error::{InfoBaseError, Result};
use crate::index::{InfoBase, InfoBaseBuilder, SelectorId};

/// Execute a CLI command.
pub fn execute_command(args: InfoBaseArgs) -> Result<()> {
    match &args.command {
        Command::Build(build_args) => build_info_base(build_args.clone(), &args),
        Command::Stats(stats_args) => show_stats(stats_args.clone(), &args),
        Command::Selectors(selectors_args) => list_selectors(selectors_args.clone(), &args),
        Command::Support(support_args) => count_support(support_args.clone(), &args),
        Command::Convert(convert_args) => convert_record(convert_args.clone(), &args),
        Command::Benchmark(benchmark_args) => run_benchmark(benchmark_args.clone(), &args),
    }
}

/// Ingest a CSV dataset and save the result.
fn build_info_base(args: BuildArgs, cli_args: &InfoBaseArgs) -> Result<()> {
    if !args.source.is_csv() {
        return Err(InfoBaseError::invalid_input(format!(
            "build expects a .csv dataset, got {}",
            args.source.source.display()
        )));
    }

    if args.output.exists() && !args.force {
        return Err(InfoBaseError::invalid_input(format!(
            "{} already exists. Use --force to overwrite.",
            args.output.display()
        )));
    }

    let start_time = Instant::now();
    let info_base = open_source(&args.source, cli_args)?;
    info_base.save(&args.output)?;
    let size_bytes = fs::metadata(&args.output)?.len();

    output_result(
        "InfoBase built successfully",
        &BuildResult {
            source: args.source.source.to_string_lossy().to_string(),
            output: args.output.to_string_lossy().to_string(),
            rows: info_base.row_count(),
            features: info_base.feature_count(),
            selectors: info_base.selector_count(),
            classes: info_base.class_ids().len(),
            size_bytes,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Show InfoBase statistics.
fn show_stats(args: StatsArgs, cli_args: &InfoBaseArgs) -> Result<()> {
    let info_base = open_source(&args.source, cli_args)?;

    let default_class = info_base
        .default_class()
        .map(|id| info_base.lookup_value(id).map(str::to_string))
        .transpose()?;

    let label_index = info_base.feature_count();
    let columns = info_base
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| ColumnInfo {
            name: column.name.clone(),
            column_type: column.column_type.to_string(),
            distinct_values: info_base.dictionary().distinct_values(i),
            is_label: i == label_index,
        })
        .collect();

    output_result(
        "InfoBase statistics",
        &StatsResult {
            source: args.source.source.to_string_lossy().to_string(),
            stats: info_base.stats(),
            default_class,
            columns,
        },
        cli_args,
    )
}

/// List constructing selectors.
fn list_selectors(args: SelectorsArgs, cli_args: &InfoBaseArgs) -> Result<()> {
    let info_base = open_source(&args.source, cli_args)?;
    let class_feature = info_base.feature_count();

    let candidates = info_base.constructing_selectors(args.min_support);
    let total = candidates.len();

    let mut selectors = Vec::with_capacity(total);
    for selector in candidates.into_iter().take(args.limit.unwrap_or(usize::MAX)) {
        selectors.push(SelectorEntry {
            id: selector.id,
            condition: info_base.condition(selector.id)?,
            frequency: selector.frequency,
            is_class: selector.feature == class_feature,
        });
    }

    output_result(
        "Constructing selectors",
        &SelectorsResult {
            min_support: args.min_support,
            total,
            selectors,
        },
        cli_args,
    )
}

/// Support count of a conjunction and its class distribution.
fn count_support(args: SupportArgs, cli_args: &InfoBaseArgs) -> Result<()> {
    let info_base = open_source(&args.source, cli_args)?;

    let mut selector_ids: Vec<SelectorId> = args.ids.clone();
    for selection in &args.select {
        let (name, value) = parse_selection(selection)?;
        selector_ids.push(info_base.lookup_named(name, value)?);
    }

    let support = info_base.support_count(&selector_ids)?;
    let conditions = selector_ids
        .iter()
        .map(|&id| info_base.condition(id))
        .collect::<Result<Vec<_>>>()?;

    let mut classes = Vec::new();
    for class_support in info_base.class_distribution(&selector_ids)? {
        classes.push(ClassCount {
            class_id: class_support.class_id,
            class: info_base.lookup_value(class_support.class_id)?.to_string(),
            count: class_support.count,
        });
    }

    let coverage = if info_base.row_count() > 0 {
        support as f64 / info_base.row_count() as f64
    } else {
        0.0
    };

    output_result(
        "Support count",
        &SupportResult {
            selector_ids,
            conditions,
            support,
            coverage,
            classes,
        },
        cli_args,
    )
}

/// Convert a feature record to selector IDs.
fn convert_record(args: ConvertArgs, cli_args: &InfoBaseArgs) -> Result<()> {
    let info_base = open_source(&args.source, cli_args)?;

    let selector_ids = if args.lenient {
        info_base.convert_partial(args.record.as_slice())?
    } else {
        info_base
            .convert(args.record.as_slice())?
            .into_iter()
            .map(Some)
            .collect()
    };

    output_result(
        "Converted record",
        &ConvertResult {
            record: args.record,
            selector_ids,
        },
        cli_args,
    )
}

/// Time support counting over random conjunctions.
fn run_benchmark(args: BenchmarkArgs, cli_args: &InfoBaseArgs) -> Result<()> {
    if args.queries == 0 || args.max_length == 0 {
        return Err(InfoBaseError::invalid_input(
            "queries and max-length must be positive",
        ));
    }

    let info_base = open_source(&args.source, cli_args)?;
    let records: Vec<Vec<SelectorId>> = info_base
        .id_records()
        .into_iter()
        .filter(|record| !record.is_empty())
        .collect();
    if records.is_empty() {
        return Err(InfoBaseError::invalid_input("InfoBase has no training records"));
    }

    // Conjunctions of selectors from one training record always have
    // support of at least one.
    let mut rng = StdRng::seed_from_u64(args.seed);
    let queries: Vec<Vec<SelectorId>> = (0..args.queries)
        .map(|_| {
            let record = &records[rng.random_range(0..records.len())];
            let length = rng.random_range(1..=args.max_length.min(record.len()));
            record.choose_multiple(&mut rng, length).copied().collect()
        })
        .collect();

    if cli_args.verbosity() > 1 {
        println!("Running {} support queries...", queries.len());
    }

    let mut latencies: Vec<Duration> = Vec::with_capacity(queries.len());
    let mut total_support = 0usize;
    let start_time = Instant::now();

    for query in &queries {
        let query_start = Instant::now();
        total_support += info_base.support_count(query)?;
        latencies.push(query_start.elapsed());
    }

    let total_duration = start_time.elapsed();
    let micros = |d: &Duration| d.as_secs_f64() * 1_000_000.0;
    let min_latency_us = latencies.iter().map(micros).fold(f64::INFINITY, f64::min);
    let max_latency_us = latencies.iter().map(micros).fold(0.0, f64::max);
    let total_queries = queries.len();

    output_result(
        "Benchmark completed",
        &BenchmarkResults {
            total_queries,
            max_length: args.max_length,
            queries_per_second: total_queries as f64 / total_duration.as_secs_f64().max(1e-9),
            average_latency_us: latencies.iter().map(micros).sum::<f64>() / total_queries as f64,
            min_latency_us,
            max_latency_us,
            average_support: total_support as f64 / total_queries as f64,
            total_duration_ms: total_duration.as_millis() as u64,
        },
        cli_args,
    )
}

/// Ingest a CSV source or load a saved InfoBase.
fn open_source(source: &SourceArgs, cli_args: &InfoBaseArgs) -> Result<InfoBase> {
    if !source.is_csv() {
        if cli_args.verbosity() > 1 {
            println!("Loading InfoBase from: {}", source.source.display());
        }
        return InfoBase::load(&source.source);
    }

    let mut config = match &source.config {
        Some(path) => {
            debug!("Loading ingestion config from {}", path.display());
            IngestConfig::from_json_file(path)?
        }
        None => IngestConfig::default(),
    };
    if source.parallel {
        config.parallel = true;
    }
    if source.skip_missing {
        config.skip_missing = true;
    }

    let label_column = match &source.label {
        Some(name) => LabelColumn::Named(name.clone()),
        None => LabelColumn::Last,
    };
    let reader = CsvDatasetReader::new()
        .with_delimiter(delimiter_byte(source.delimiter)?)
        .with_label_column(label_column);

    if cli_args.verbosity() > 1 {
        println!("Reading dataset from: {}", source.source.display());
    }
    let dataset = reader.read_path(&source.source)?;
    info!(
        "Read {} rows with {} features from {}",
        dataset.row_count(),
        dataset.feature_count(),
        source.source.display()
    );

    InfoBaseBuilder::new(config).build(&dataset)
}

/// Split `column=value` at the first `=`.
fn parse_selection(selection: &str) -> Result<(&str, &str)> {
    selection
        .split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| {
            InfoBaseError::invalid_input(format!(
                "Invalid selector {selection:?}, expected COLUMN=VALUE"
            ))
        })
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            InfoBaseError::invalid_input(format!("Delimiter {delimiter:?} is not ASCII"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("outlook=sunny").unwrap(), ("outlook", "sunny"));
        assert_eq!(parse_selection("expr=a=b").unwrap(), ("expr", "a=b"));
        assert_eq!(parse_selection("temp=").unwrap(), ("temp", ""));
        assert!(parse_selection("outlook").unwrap_err().is_invalid_input());
        assert!(parse_selection("=sunny").is_err());
    }

    #[test]
    fn test_delimiter_byte() {
        assert_eq!(delimiter_byte(',').unwrap(), b',');
        assert_eq!(delimiter_byte('\t').unwrap(), b'\t');
        assert!(delimiter_byte('é').is_err());
    }
}
