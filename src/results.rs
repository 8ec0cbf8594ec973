use crate::corpus::FrequencyTable;
use crate::error::RpResult;
use crate::message;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// One optimizer output record, as found in the results JSON.
#[derive(Debug, Deserialize)]
pub struct RawResult {
    pub total_cost: f64,
    pub details: ResultDetails,
}

#[derive(Debug, Deserialize)]
pub struct ResultDetails {
    pub layout: String,
    pub individual_results: Vec<MetricGroup>,
}

#[derive(Debug, Deserialize)]
pub struct MetricGroup {
    pub metric_costs: Vec<MetricCost>,
}

#[derive(Debug, Deserialize)]
pub struct MetricCost {
    pub core: MetricCore,
    pub weighted_cost: f64,
}

#[derive(Debug, Deserialize)]
pub struct MetricCore {
    pub name: String,
    pub message: String,
}

/// How a column renders its source metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// Numeric cost rounded to `decimals` places.
    Number,
    /// The fully cleaned message text.
    MessageOnly,
    /// Same cleaning, for metrics whose payload is their worst-case summary.
    WorstOnly,
}

/// One entry of the fixed column schema.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub display: &'static str,
    pub metric: &'static str,
    pub kind: FormatKind,
    pub decimals: usize,
}

/// Sentinel metric name for the column fed by the record's own total.
const TOTAL_COST_METRIC: &str = "total_cost";

/// Metrics whose messages get corpus frequency enrichment.
const ENRICHED_METRICS: [&str; 2] = ["Scissoring", "Cluster Rolls"];

/// The fixed, ordered metric column schema. Every output row carries exactly
/// these columns (plus the leading `Layout`), in this order, with absent
/// metrics rendered as empty strings.
pub const METRIC_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec { display: "Total Cost", metric: TOTAL_COST_METRIC, kind: FormatKind::Number, decimals: 1 },
    ColumnSpec { display: "Hands Disbalance", metric: "Hand Disbalance", kind: FormatKind::MessageOnly, decimals: 0 },
    ColumnSpec { display: "Finger Disbalance", metric: "Finger Balance", kind: FormatKind::MessageOnly, decimals: 0 },
    ColumnSpec { display: "Cluster Rolls", metric: "Cluster Rolls", kind: FormatKind::Number, decimals: 2 },
    ColumnSpec { display: "Scissoring", metric: "Scissoring", kind: FormatKind::Number, decimals: 2 },
    ColumnSpec { display: "Key Costs", metric: "Key Costs", kind: FormatKind::Number, decimals: 2 },
    ColumnSpec { display: "Movement Pattern", metric: "Movement Pattern", kind: FormatKind::Number, decimals: 2 },
    ColumnSpec { display: "Cluster Rolls Worst", metric: "Cluster Rolls", kind: FormatKind::WorstOnly, decimals: 0 },
    ColumnSpec { display: "Scissoring Worst", metric: "Scissoring", kind: FormatKind::WorstOnly, decimals: 0 },
    ColumnSpec { display: "Movement Pattern Worst", metric: "Movement Pattern", kind: FormatKind::WorstOnly, decimals: 0 },
    ColumnSpec { display: "Secondary Bigrams Worst", metric: "Secondary Bigrams", kind: FormatKind::WorstOnly, decimals: 0 },
    ColumnSpec { display: "Trigrams Worst", metric: "No Handswitch in Trigram", kind: FormatKind::WorstOnly, decimals: 0 },
];

/// `Layout` plus the display name of every metric column.
pub fn column_headers() -> Vec<&'static str> {
    std::iter::once("Layout")
        .chain(METRIC_COLUMNS.iter().map(|spec| spec.display))
        .collect()
}

/// One normalized output row. Values are pre-rendered strings parallel to
/// [`METRIC_COLUMNS`]; the row is immutable once built.
#[derive(Debug, Clone)]
pub struct NormalizedRow {
    pub layout: String,
    values: Vec<String>,
}

impl NormalizedRow {
    /// Looks a cell up by display header (`"Layout"` included). Unknown
    /// headers resolve to an empty string.
    pub fn get(&self, display: &str) -> &str {
        if display == "Layout" {
            return &self.layout;
        }
        METRIC_COLUMNS
            .iter()
            .position(|spec| spec.display == display)
            .map(|idx| self.values[idx].as_str())
            .unwrap_or("")
    }

    /// All cells in header order, `Layout` first.
    pub fn cells(&self) -> Vec<&str> {
        std::iter::once(self.layout.as_str())
            .chain(self.values.iter().map(String::as_str))
            .collect()
    }
}

struct MetricEntry {
    cost: f64,
    message: String,
}

/// Flattens all metric costs across a record's individual results into one
/// name-keyed map. Later occurrences of a metric name overwrite earlier ones.
/// Scissoring and Cluster Rolls messages are enriched when a frequency table
/// is present.
fn flatten_metrics(result: &RawResult, frequencies: &FrequencyTable) -> HashMap<String, MetricEntry> {
    let mut metrics = HashMap::new();

    for group in &result.details.individual_results {
        for metric_cost in &group.metric_costs {
            let name = &metric_cost.core.name;
            let mut msg = metric_cost.core.message.clone();

            if ENRICHED_METRICS.contains(&name.as_str()) && !frequencies.is_empty() {
                msg = message::add_frequencies(&msg, frequencies);
                msg = message::format_frequencies(&msg);
            }

            metrics.insert(
                name.clone(),
                MetricEntry {
                    cost: metric_cost.weighted_cost,
                    message: msg,
                },
            );
        }
    }

    metrics
}

/// Builds the normalized row for one record following the column schema.
pub fn build_row(result: &RawResult, frequencies: &FrequencyTable) -> NormalizedRow {
    let metrics = flatten_metrics(result, frequencies);

    let values = METRIC_COLUMNS
        .iter()
        .map(|spec| match spec.kind {
            FormatKind::Number if spec.metric == TOTAL_COST_METRIC => {
                round_cell(result.total_cost, spec.decimals)
            }
            FormatKind::Number => metrics
                .get(spec.metric)
                .map(|entry| round_cell(entry.cost, spec.decimals))
                .unwrap_or_default(),
            FormatKind::MessageOnly | FormatKind::WorstOnly => metrics
                .get(spec.metric)
                .map(|entry| message::clean_worst_message(&entry.message, spec.metric))
                .unwrap_or_default(),
        })
        .collect();

    NormalizedRow {
        layout: result.details.layout.clone(),
        values,
    }
}

/// Loads the results JSON and produces one normalized row per layout, sorted
/// ascending by total cost. The sort is stable: equal totals keep their source
/// order, the only ordering guarantee the input carries.
pub fn parse_layouts(json_file: &Path, frequencies: &FrequencyTable) -> RpResult<Vec<NormalizedRow>> {
    let content = fs::read_to_string(json_file)?;
    let mut data: Vec<RawResult> = serde_json::from_str(&content)?;

    data.sort_by(|a, b| {
        a.total_cost
            .partial_cmp(&b.total_cost)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    debug!("Normalizing {} layout results", data.len());
    Ok(data
        .iter()
        .map(|result| build_row(result, frequencies))
        .collect())
}

/// Rounds a cost the way the CSV renders numbers: fixed decimals, then
/// trailing zeros stripped down to at least one fractional digit
/// (`12.30` -> "12.3", `5.00` -> "5.0").
fn round_cell(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    match formatted.split_once('.') {
        Some((int_part, frac_part)) => {
            let trimmed = frac_part.trim_end_matches('0');
            if trimmed.is_empty() {
                format!("{}.0", int_part)
            } else {
                format!("{}.{}", int_part, trimmed)
            }
        }
        None => formatted,
    }
}
