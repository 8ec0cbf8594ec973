use crate::error::RpResult;
use crate::results::{column_headers, NormalizedRow};
use crate::svg::GeneratedLayout;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Summary table headers, in order. The SVG and Layout cells are synthesized;
/// the middle five come from the row.
const SUMMARY_HEADERS: [&str; 7] = [
    "SVG",
    "Total Cost",
    "Hand Balance",
    "Finger Balance",
    "Cluster Rolls",
    "Scissoring",
    "Layout",
];

/// Row columns backing the five value cells of the summary table.
const SUMMARY_METRICS: [&str; 5] = [
    "Total Cost",
    "Hands Disbalance",
    "Finger Disbalance",
    "Cluster Rolls",
    "Scissoring",
];

/// Static glossary appended to every report. Fixed text, not derived from data.
pub const METRICS_DESCRIPTION: &str = r"## Metrics Description

**finger_balance**: Left pinky -> left index and then right index -> right pinky

**hand_disbalance**: Left and right hand balance

**direction_balance**: Tracks keypress patterns in different directions (informational only). Center and south keys are ideal

**key_costs**: Penalizes using keys that are harder to reach based on position (based on direction and finger)

**cluster_rolls**: Evaluates the comfort of same finger bigrams. Center to south bigrams are good here.

**scissoring**: Penalizes uncomfortable adjacent finger movements

**symmetric_handswitches**: Rewards using symmetrical key positions when switching between hands, but only for center, south, and index/middle north keys

**movement_pattern**: Assigns costs to finger transitions within the same hand. If the movement is center key to center key or south key to south key, there is no penalty

**secondary_bigrams**: Evaluates the comfort of the first and last keys in three-key sequences

**no_handswitch_in_trigram**: Penalizes typing three consecutive keys on the same hand

**trigram_rolls**: Rewards comfortable inward rolling motions and slightly less for outward rolls in three-key sequences. Center and south keys only

";

/// Anchor slug for a layout heading: lower-cased, spaces replaced by
/// underscores. Must be bit-identical between the TOC, summary links and
/// detail headings.
pub fn anchor_slug(layout: &str) -> String {
    layout.replace(' ', "_").to_lowercase()
}

/// Writes the combined report: table of contents, summary table with embedded
/// diagram images, per-layout detail sections and the static metrics glossary.
pub fn export_markdown(
    records: &[NormalizedRow],
    generated_layouts: &[GeneratedLayout],
    output_file: &Path,
) -> RpResult<()> {
    fs::write(output_file, render_markdown(records, generated_layouts))?;
    Ok(())
}

fn render_markdown(records: &[NormalizedRow], generated_layouts: &[GeneratedLayout]) -> String {
    let layout_to_svg: HashMap<&str, &Path> = generated_layouts
        .iter()
        .map(|gen| (gen.layout_string.as_str(), gen.svg_path.as_path()))
        .collect();

    let mut out = String::new();
    out.push_str("# Keyboard Layout Results\n\n");

    write_toc(&mut out, records);
    write_summary(&mut out, records, &layout_to_svg);
    write_details(&mut out, records);

    out.push_str(METRICS_DESCRIPTION);
    out
}

fn write_toc(out: &mut String, records: &[NormalizedRow]) {
    let mut items = vec![
        "- [Summary](#summary)".to_string(),
        "- [Layout Details](#layout-details)".to_string(),
    ];
    items.extend(
        records
            .iter()
            .map(|rec| format!("  - [{}](#{})", rec.layout, anchor_slug(&rec.layout))),
    );
    items.push("- [Metrics Description](#metrics-description)".to_string());

    out.push_str("## Table of Contents\n\n");
    out.push_str(&items.join("\n"));
    out.push_str("\n\n");
}

fn write_summary(
    out: &mut String,
    records: &[NormalizedRow],
    layout_to_svg: &HashMap<&str, &Path>,
) {
    out.push_str("## Summary\n\n");
    let _ = writeln!(out, "| {} |", SUMMARY_HEADERS.join(" | "));
    let _ = writeln!(out, "{}", separator_row(SUMMARY_HEADERS.len()));

    for rec in records {
        // Layout strings from the JSON and the text log are joined by exact
        // string match; a miss means "no image", never an error.
        let svg_cell = layout_to_svg
            .get(rec.layout.as_str())
            .and_then(|path| path.file_name())
            .map(|name| format!("<img src=\"svgs/{}\" width=\"600\">", name.to_string_lossy()))
            .unwrap_or_default();
        let layout_link = format!("[{}](#{})", rec.layout, anchor_slug(&rec.layout));

        let mut cells = vec![svg_cell];
        cells.extend(SUMMARY_METRICS.iter().map(|m| rec.get(m).to_string()));
        cells.push(layout_link);
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }
}

fn write_details(out: &mut String, records: &[NormalizedRow]) {
    out.push_str("\n## Layout Details\n\n");

    for rec in records {
        let _ = writeln!(out, "### {}\n", rec.layout);
        let _ = writeln!(out, "**Total Cost:** {}\n", rec.get("Total Cost"));
        out.push_str("#### All Metrics\n\n");

        let metrics: Vec<(&str, &str)> = column_headers()[1..]
            .iter()
            .filter(|header| !header.contains("Worst") && **header != "Total Cost")
            .map(|header| (*header, rec.get(header)))
            .filter(|(_, value)| !value.is_empty())
            .collect();
        if !metrics.is_empty() {
            let names: Vec<&str> = metrics.iter().map(|(name, _)| *name).collect();
            let values: Vec<&str> = metrics.iter().map(|(_, value)| *value).collect();
            let _ = writeln!(out, "| {} |", names.join(" | "));
            let _ = writeln!(out, "{}", separator_row(names.len()));
            let _ = writeln!(out, "| {} |", values.join(" | "));
        }

        let worst_cases: Vec<(String, &str)> = column_headers()[1..]
            .iter()
            .filter(|header| header.contains("Worst"))
            .map(|header| (header.replace(" Worst", ""), rec.get(header)))
            .filter(|(_, value)| !value.is_empty())
            .collect();
        if !worst_cases.is_empty() {
            out.push_str("\n#### Worst Cases\n\n");
            for (name, value) in worst_cases {
                let _ = writeln!(out, "- **{}:** {}", name, value);
            }
        }

        out.push_str("\n---\n\n");
    }
}

fn separator_row(columns: usize) -> String {
    format!("|{}|", vec!["--------"; columns].join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::FrequencyTable;
    use crate::results::{build_row, MetricCore, MetricCost, MetricGroup, RawResult, ResultDetails};
    use std::path::PathBuf;

    fn row(layout: &str, total: f64) -> NormalizedRow {
        let result = RawResult {
            total_cost: total,
            details: ResultDetails {
                layout: layout.to_string(),
                individual_results: vec![MetricGroup {
                    metric_costs: vec![
                        MetricCost {
                            core: MetricCore {
                                name: "Scissoring".to_string(),
                                message: "Worst: th (4.32%)".to_string(),
                            },
                            weighted_cost: 2.5,
                        },
                        MetricCost {
                            core: MetricCore {
                                name: "Key Costs".to_string(),
                                message: "irrelevant".to_string(),
                            },
                            weighted_cost: 1.25,
                        },
                    ],
                }],
            },
        };
        build_row(&result, &FrequencyTable::new())
    }

    #[test]
    fn anchors_match_between_toc_summary_and_headings() {
        let records = vec![row("Colemak Mod DH", 10.0)];
        let md = render_markdown(&records, &[]);

        assert!(md.contains("  - [Colemak Mod DH](#colemak_mod_dh)"));
        assert!(md.contains("[Colemak Mod DH](#colemak_mod_dh) |"));
        assert!(md.contains("### Colemak Mod DH\n"));
    }

    #[test]
    fn summary_embeds_images_only_for_generated_layouts() {
        let records = vec![row("abc", 5.0), row("xyz", 6.0)];
        let generated = vec![GeneratedLayout {
            layout_string: "abc".to_string(),
            svg_path: PathBuf::from("out/svgs/abc.svg"),
        }];
        let md = render_markdown(&records, &generated);

        assert!(md.contains("<img src=\"svgs/abc.svg\" width=\"600\">"));
        assert!(!md.contains("xyz.svg"));
    }

    #[test]
    fn details_omit_empty_metrics_and_strip_worst_suffix() {
        let records = vec![row("abc", 5.0)];
        let md = render_markdown(&records, &[]);

        // Scissoring appears both as a number column and as a worst-case bullet.
        assert!(md.contains("| Scissoring | Key Costs |"));
        assert!(md.contains("| 2.5 | 1.25 |"));
        assert!(md.contains("- **Scissoring:** th (4.32%)"));
        // Metrics absent from the source never show up in the details table.
        assert!(!md.contains("| Movement Pattern |"));
    }

    #[test]
    fn report_ends_with_the_static_glossary() {
        let md = render_markdown(&[], &[]);
        assert!(md.ends_with(METRICS_DESCRIPTION));
        assert!(md.contains("**no_handswitch_in_trigram**"));
    }
}
