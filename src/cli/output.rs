//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{InfoBaseArgs, OutputFormat};
use crate::error::Result;
use crate::index::InfoBaseStats;

/// Result structure for building an InfoBase.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildResult {
    pub source: String,
    pub output: String,
    pub rows: usize,
    pub features: usize,
    pub selectors: usize,
    pub classes: usize,
    pub size_bytes: u64,
    pub duration_ms: u64,
}

/// Per-column details.
#[derive(Debug, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub column_type: String,
    pub distinct_values: usize,
    pub is_label: bool,
}

/// InfoBase statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResult {
    pub source: String,
    #[serde(flatten)]
    pub stats: InfoBaseStats,
    pub default_class: Option<String>,
    pub columns: Vec<ColumnInfo>,
}

/// One selector in a listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct SelectorEntry {
    pub id: u32,
    pub condition: String,
    pub frequency: u32,
    pub is_class: bool,
}

/// Result structure for listing selectors.
#[derive(Debug, Serialize, Deserialize)]
pub struct SelectorsResult {
    pub min_support: usize,
    pub total: usize,
    pub selectors: Vec<SelectorEntry>,
}

/// Support of `body ∧ class` for one class.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassCount {
    pub class_id: u32,
    pub class: String,
    pub count: usize,
}

/// Result structure for support counting.
#[derive(Debug, Serialize, Deserialize)]
pub struct SupportResult {
    pub selector_ids: Vec<u32>,
    pub conditions: Vec<String>,
    pub support: usize,
    pub coverage: f64,
    pub classes: Vec<ClassCount>,
}

/// Result structure for record conversion.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertResult {
    pub record: Vec<String>,
    pub selector_ids: Vec<Option<u32>>,
}

/// Benchmark results.
#[derive(Debug, Serialize, Deserialize)]
pub struct BenchmarkResults {
    pub total_queries: usize,
    pub max_length: usize,
    pub queries_per_second: f64,
    pub average_latency_us: f64,
    pub min_latency_us: f64,
    pub max_latency_us: f64,
    pub average_support: f64,
    pub total_duration_ms: u64,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &InfoBaseArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &InfoBaseArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    // Convert to JSON value for easier manipulation
    let value = serde_json::to_value(result)?;

    match result {
        _ if std::any::type_name::<T>().contains("SelectorsResult") => {
            output_selectors_human(&value)
        }
        _ if std::any::type_name::<T>().contains("StatsResult") => output_stats_human(&value),
        _ if std::any::type_name::<T>().contains("SupportResult") => output_support_human(&value),
        _ if std::any::type_name::<T>().contains("BenchmarkResults") => {
            output_benchmark_results_human(&value)
        }
        _ => output_generic_human(&value),
    }
}

/// Output a selector listing in human format.
fn output_selectors_human(value: &serde_json::Value) -> Result<()> {
    if let Some(obj) = value.as_object()
        && let Some(selectors) = obj.get("selectors").and_then(|s| s.as_array())
    {
        println!("{:>6}  {:>9}  Condition", "ID", "Frequency");
        println!("──────  ─────────  ─────────");

        for selector in selectors {
            let id = selector.get("id").and_then(|i| i.as_u64()).unwrap_or(0);
            let frequency = selector.get("frequency").and_then(|f| f.as_u64()).unwrap_or(0);
            let condition = selector.get("condition").and_then(|c| c.as_str()).unwrap_or("");
            let marker = if selector.get("is_class").and_then(|c| c.as_bool()) == Some(true) {
                "  [class]"
            } else {
                ""
            };
            println!("{id:>6}  {frequency:>9}  {condition}{marker}");
        }

        println!();
        if let Some(total) = obj.get("total").and_then(|t| t.as_u64()) {
            println!("Constructing selectors: {total}");
        }
    }
    Ok(())
}

/// Output InfoBase statistics in human format.
fn output_stats_human(value: &serde_json::Value) -> Result<()> {
    if let Some(obj) = value.as_object() {
        println!("InfoBase Statistics:");
        println!("════════════════════");

        if let Some(source) = obj.get("source").and_then(|s| s.as_str()) {
            println!("Source: {source}");
        }
        if let Some(rows) = obj.get("rows").and_then(|r| r.as_u64()) {
            println!("Rows: {rows}");
        }
        if let Some(features) = obj.get("features").and_then(|f| f.as_u64()) {
            println!("Features: {features}");
        }
        if let Some(selectors) = obj.get("selectors").and_then(|s| s.as_u64()) {
            println!("Selectors: {selectors}");
        }
        if let Some(classes) = obj.get("classes").and_then(|c| c.as_u64()) {
            println!("Classes: {classes}");
        }
        if let Some(default_class) = obj.get("default_class").and_then(|d| d.as_str()) {
            println!("Default class: {default_class}");
        }
        if let Some(postings) = obj.get("total_postings").and_then(|t| t.as_u64()) {
            println!("Total postings: {postings}");
        }
        if let Some(avg_len) = obj.get("avg_nlist_len").and_then(|a| a.as_f64()) {
            println!("Average nlist length: {avg_len:.1}");
        }
        if let Some(max_len) = obj.get("max_nlist_len").and_then(|m| m.as_u64()) {
            println!("Max nlist length: {max_len}");
        }

        if let Some(columns) = obj.get("columns").and_then(|c| c.as_array()) {
            println!();
            println!("Columns:");
            println!("────────");

            for column in columns {
                let name = column.get("name").and_then(|n| n.as_str()).unwrap_or("?");
                let column_type = column
                    .get("column_type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("?");
                let distinct = column
                    .get("distinct_values")
                    .and_then(|d| d.as_u64())
                    .unwrap_or(0);
                let label = if column.get("is_label").and_then(|l| l.as_bool()) == Some(true) {
                    " (label)"
                } else {
                    ""
                };
                println!("  {name}{label}: {column_type}, {distinct} distinct values");
            }
        }
    }
    Ok(())
}

/// Output a support count in human format.
fn output_support_human(value: &serde_json::Value) -> Result<()> {
    if let Some(obj) = value.as_object() {
        if let Some(conditions) = obj.get("conditions").and_then(|c| c.as_array()) {
            let body: Vec<&str> = conditions.iter().filter_map(|c| c.as_str()).collect();
            println!("Conditions: {}", body.join(" ∧ "));
        }
        if let Some(support) = obj.get("support").and_then(|s| s.as_u64()) {
            let coverage = obj.get("coverage").and_then(|c| c.as_f64()).unwrap_or(0.0);
            println!("Support: {support} ({:.1}%)", coverage * 100.0);
        }

        if let Some(classes) = obj.get("classes").and_then(|c| c.as_array()) {
            println!();
            println!("Class distribution:");
            for class in classes {
                let name = class.get("class").and_then(|n| n.as_str()).unwrap_or("?");
                let count = class.get("count").and_then(|c| c.as_u64()).unwrap_or(0);
                println!("  {name}: {count}");
            }
        }
    }
    Ok(())
}

/// Output benchmark results in human format.
fn output_benchmark_results_human(value: &serde_json::Value) -> Result<()> {
    if let Some(obj) = value.as_object() {
        println!("Benchmark Results:");
        println!("═════════════════");

        if let Some(qps) = obj.get("queries_per_second").and_then(|q| q.as_f64()) {
            println!("Queries per second: {qps:.1}");
        }
        if let Some(avg) = obj.get("average_latency_us").and_then(|a| a.as_f64()) {
            println!("Average latency: {avg:.2}µs");
        }
        if let Some(min) = obj.get("min_latency_us").and_then(|m| m.as_f64()) {
            println!("Min latency: {min:.2}µs");
        }
        if let Some(max) = obj.get("max_latency_us").and_then(|m| m.as_f64()) {
            println!("Max latency: {max:.2}µs");
        }
        if let Some(support) = obj.get("average_support").and_then(|s| s.as_f64()) {
            println!("Average support: {support:.1}");
        }
        if let Some(total) = obj.get("total_queries").and_then(|t| t.as_u64()) {
            println!("Total queries: {total}");
        }
        if let Some(total_duration) = obj.get("total_duration_ms").and_then(|t| t.as_u64()) {
            println!();
            println!("Total benchmark time: {total_duration}ms");
        }
    }
    Ok(())
}

/// Output generic data in human format.
fn output_generic_human(value: &serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = match key.as_str() {
                    "size_bytes" => val.as_u64().map_or_else(|| format_value(val), format_bytes),
                    _ => format_value(val),
                };
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(value);
            println!("{formatted_value}");
        }
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &InfoBaseArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "null".to_string(),
    }
}

/// Format bytes into human-readable format.
fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    let unit = UNITS[unit_index];
    if unit_index == 0 {
        format!("{bytes} {unit}")
    } else {
        format!("{size:.1} {unit}")
    }
}
