use crate::corpus::FrequencyTable;
use regex::{Captures, Regex};

/// Marker introducing the worst-case clause of a metric message.
const WORST_MARKER: &str = "Worst:";

/// Marker for the trailing non-fixed clause (note the two spaces).
const WORST_NON_FIXED_MARKER: &str = ";  Worst non-fixed:";

/// Label prefixes that carry no information once a value sits in its own column.
const LABEL_PREFIXES: [&str; 3] = [
    "Finger loads % (no thumb): ",
    "Hand loads % (no thumb): ",
    "Worst: ",
];

/// Metrics whose messages hold plain load percentages rather than worst-case lists.
const DISBALANCE_METRICS: [&str; 2] = ["Hand Disbalance", "Finger Balance"];

/// One worst-case entry called out in a metric message.
#[derive(Debug, Clone, PartialEq)]
pub struct WorstFinding {
    pub bigram: String,
    pub percent: f64,
}

/// `th (4.32%)` — a bigram followed by its parenthesized percentage.
fn worst_finding_re() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\w{2}) \(([0-9.]+)%\)").unwrap())
}

/// `freq: 4.500000` — a frequency annotation to be re-formatted.
fn freq_annotation_re() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"freq: (\d+\.?\d*)").unwrap())
}

/// A decimal number, optionally followed by `%)` (which exempts it from rounding).
fn bare_decimal_re() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+\.\d+)(%\))?").unwrap())
}

/// A decimal number immediately followed by `%,`.
fn percent_comma_re() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+\.\d+)%,").unwrap())
}

/// Extracts the worst-case bigram/percentage pairs from a message.
///
/// Only the text between the first `Worst:` marker and the next `;` is
/// scanned; match order is preserved. Messages without the marker (or without
/// any well-formed pair) yield an empty list.
pub fn extract_worst_bigrams(message: &str) -> Vec<WorstFinding> {
    let Some((_, after_marker)) = message.split_once(WORST_MARKER) else {
        return Vec::new();
    };
    let section = after_marker.split(';').next().unwrap_or(after_marker);

    worst_finding_re()
        .captures_iter(section)
        .filter_map(|caps| {
            let percent: f64 = caps[2].parse().ok()?;
            Some(WorstFinding {
                bigram: caps[1].to_string(),
                percent,
            })
        })
        .collect()
}

/// Rewrites each worst-case finding as `bigram (percent%, freq: freqStr)`,
/// looking frequencies up in the corpus table (0 when absent).
///
/// Text before the marker and any `;`-separated remainder are carried over
/// verbatim. Messages with no extractable findings pass through unchanged.
pub fn add_frequencies(message: &str, frequencies: &FrequencyTable) -> String {
    let findings = extract_worst_bigrams(message);
    if findings.is_empty() {
        return message.to_string();
    }
    let Some((before_marker, _)) = message.split_once(WORST_MARKER) else {
        return message.to_string();
    };

    let enhanced: Vec<String> = findings
        .iter()
        .map(|finding| {
            let freq = frequencies.get(&finding.bigram).copied().unwrap_or(0.0);
            format!(
                "{} ({}%, freq: {})",
                finding.bigram,
                fmt_float(finding.percent),
                fmt_percent(freq)
            )
        })
        .collect();

    let mut enhanced_message = format!("{}Worst: {}", before_marker, enhanced.join(", "));
    if let Some((_, after_semicolon)) = message.split_once(';') {
        enhanced_message.push(';');
        enhanced_message.push_str(after_semicolon);
    }
    enhanced_message
}

/// Re-formats every `freq: <number>` annotation to 3 decimals with trailing
/// zeros stripped, restoring a single `.0` when stripping removed the whole
/// fractional part (`4.500000` -> `4.5`, `4.000000` -> `4.0`).
pub fn format_frequencies(message: &str) -> String {
    freq_annotation_re()
        .replace_all(message, |caps: &Captures| {
            let Ok(value) = caps[1].parse::<f64>() else {
                return caps[0].to_string();
            };
            let mut formatted = strip_trailing_zeros(&format!("{:.3}", value));
            if !formatted.contains('.') {
                formatted.push_str(".0");
            }
            format!("freq: {}", formatted)
        })
        .into_owned()
}

/// Strips the non-fixed clause and label prefixes, then normalizes embedded
/// decimals: disbalance metrics round numbers not followed by `%)` to 1
/// decimal, all other metrics round numbers followed by `%,` to 2 decimals.
pub fn clean_worst_message(message: &str, metric_name: &str) -> String {
    let mut message = match message.split_once(WORST_NON_FIXED_MARKER) {
        Some((head, _)) => head.to_string(),
        None => message.to_string(),
    };

    for prefix in LABEL_PREFIXES {
        message = message.replace(prefix, "");
    }

    let message = if DISBALANCE_METRICS.contains(&metric_name) {
        bare_decimal_re()
            .replace_all(&message, |caps: &Captures| {
                if caps.get(2).is_some() {
                    caps[0].to_string()
                } else {
                    let value: f64 = caps[1].parse().unwrap_or(0.0);
                    format!("{:.1}", value)
                }
            })
            .into_owned()
    } else {
        percent_comma_re()
            .replace_all(&message, |caps: &Captures| {
                let value: f64 = caps[1].parse().unwrap_or(0.0);
                format!("{:.2}%,", value)
            })
            .into_owned()
    };

    message.trim().to_string()
}

/// Shortest decimal rendering with at least one fractional digit
/// (`4.32` -> "4.32", `4.0` -> "4.0").
fn fmt_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Percent string with trailing zeros and a trailing decimal point stripped
/// (`4.5` -> "4.5%", never "4.50%" or "4.%").
fn fmt_percent(value: f64) -> String {
    format!("{}%", strip_trailing_zeros(&format!("{:.2}", value)))
}

fn strip_trailing_zeros(formatted: &str) -> String {
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn table(entries: &[(&str, f64)]) -> FrequencyTable {
        entries
            .iter()
            .map(|(bigram, freq)| (bigram.to_string(), *freq))
            .collect()
    }

    #[test]
    fn extracts_pairs_in_match_order() {
        let findings = extract_worst_bigrams(
            "Scissoring total;  Worst: th (4.32%), he (3.1%);  Worst non-fixed: xq (9.99%)",
        );
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].bigram, "th");
        assert_eq!(findings[0].percent, 4.32);
        assert_eq!(findings[1].bigram, "he");
        assert_eq!(findings[1].percent, 3.1);
    }

    #[rstest]
    #[case("no marker here")]
    #[case("Worst: nothing well-formed")]
    #[case("Worst: t (1.0%)")]
    fn extraction_yields_nothing(#[case] message: &str) {
        assert!(extract_worst_bigrams(message).is_empty());
    }

    #[test]
    fn enrichment_rewrites_findings_and_keeps_remainder() {
        let freqs = table(&[("th", 3.556)]);
        let message = "Worst: th (4.32%), he (3.1%);  Worst non-fixed: xq (9.99%)";
        let enhanced = add_frequencies(message, &freqs);
        assert_eq!(
            enhanced,
            "Worst: th (4.32%, freq: 3.56%), he (3.1%, freq: 0%);  Worst non-fixed: xq (9.99%)"
        );
        assert_eq!(
            format_frequencies(&enhanced),
            "Worst: th (4.32%, freq: 3.56%), he (3.1%, freq: 0.0%);  Worst non-fixed: xq (9.99%)"
        );
    }

    #[test]
    fn enrichment_without_marker_is_identity() {
        let freqs = table(&[("th", 3.5)]);
        let message = "Inward: 4.1%, Outward: 2.2%";
        assert_eq!(add_frequencies(message, &freqs), message);
    }

    #[test]
    fn enrichment_without_findings_is_identity() {
        let freqs = table(&[("th", 3.5)]);
        let message = "Worst: nothing parseable";
        assert_eq!(add_frequencies(message, &freqs), message);
    }

    #[test]
    fn missing_bigram_enriches_with_zero() {
        let enhanced = format_frequencies(&add_frequencies("Worst: zq (1.25%)", &table(&[])));
        assert_eq!(enhanced, "Worst: zq (1.25%, freq: 0.0%)");
    }

    #[rstest]
    #[case("freq: 4.500000", "freq: 4.5")]
    #[case("freq: 4.000000", "freq: 4.0")]
    #[case("freq: 4.125000", "freq: 4.125")]
    #[case("a (freq: 10.000), b (freq: 0.05)", "a (freq: 10.0), b (freq: 0.05)")]
    fn frequency_reformatting(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_frequencies(input), expected);
    }

    #[rstest]
    #[case("Finger loads % (no thumb): 12.345", "Finger Balance", "12.3")]
    #[case(
        "Hand loads % (no thumb): 48.33 - 51.67",
        "Hand Disbalance",
        "48.3 - 51.7"
    )]
    #[case(
        "Worst: th (4.327%, freq: 2.2), he (3.1%, freq: 0.0)",
        "Scissoring",
        "th (4.33%, freq: 2.2), he (3.10%, freq: 0.0)"
    )]
    #[case(
        "Worst: th (4.32%);  Worst non-fixed: ab (1.00%)",
        "Movement Pattern",
        "th (4.32%)"
    )]
    fn message_cleanup(#[case] input: &str, #[case] metric: &str, #[case] expected: &str) {
        assert_eq!(clean_worst_message(input, metric), expected);
    }

    #[test]
    fn disbalance_rounding_spares_percent_parens() {
        assert_eq!(
            clean_worst_message("spread 12.345 at (4.32%)", "Finger Balance"),
            "spread 12.3 at (4.32%)"
        );
    }
}
