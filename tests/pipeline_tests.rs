use keyreport::corpus::FrequencyTable;
use keyreport::reports::export_csv;
use keyreport::results::{column_headers, parse_layouts};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const RESULTS_JSON: &str = r#"[
  {
    "total_cost": 10.0,
    "details": {
      "layout": "b l d w q",
      "individual_results": [
        {
          "metric_costs": [
            {"core": {"name": "Key Costs", "message": "3.25"}, "weighted_cost": 3.25},
            {"core": {"name": "Hand Disbalance", "message": "Hand loads % (no thumb): 48.333 - 51.667"}, "weighted_cost": 0.5}
          ]
        },
        {
          "metric_costs": [
            {"core": {"name": "Scissoring", "message": "Worst: th (4.32%), he (3.1%);  Worst non-fixed: qz (0.15%)"}, "weighted_cost": 2.25}
          ]
        }
      ]
    }
  },
  {
    "total_cost": 5.0,
    "details": {
      "layout": "c m t s r",
      "individual_results": [
        {
          "metric_costs": [
            {"core": {"name": "Cluster Rolls", "message": "Worst: ne (2.5%)"}, "weighted_cost": 1.5}
          ]
        }
      ]
    }
  }
]"#;

fn write_results(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("results.json");
    fs::write(&path, RESULTS_JSON).unwrap();
    path
}

#[test]
fn rows_sorted_ascending_by_total_cost() {
    let dir = tempfile::tempdir().unwrap();
    let json = write_results(&dir);

    let rows = parse_layouts(&json, &FrequencyTable::new()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].layout, "c m t s r");
    assert_eq!(rows[1].layout, "b l d w q");
}

#[test]
fn equal_totals_keep_source_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ties.json");
    fs::write(
        &path,
        r#"[
          {"total_cost": 7.5, "details": {"layout": "first", "individual_results": []}},
          {"total_cost": 7.5, "details": {"layout": "second", "individual_results": []}},
          {"total_cost": 1.0, "details": {"layout": "cheapest", "individual_results": []}}
        ]"#,
    )
    .unwrap();

    let rows = parse_layouts(&path, &FrequencyTable::new()).unwrap();
    let order: Vec<&str> = rows.iter().map(|r| r.layout.as_str()).collect();
    assert_eq!(order, vec!["cheapest", "first", "second"]);
}

#[test]
fn csv_has_fixed_headers_and_sorted_rows() {
    let dir = tempfile::tempdir().unwrap();
    let json = write_results(&dir);
    let csv_file = dir.path().join("results.csv");

    let rows = parse_layouts(&json, &FrequencyTable::new()).unwrap();
    export_csv(&rows, &csv_file).unwrap();

    let mut reader = csv::Reader::from_path(&csv_file).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, column_headers());

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);

    // Cheapest layout first; every row carries the full column set.
    assert_eq!(&records[0][0], "c m t s r");
    assert_eq!(&records[0][1], "5.0");
    assert_eq!(records[0].len(), 13);

    assert_eq!(&records[1][0], "b l d w q");
    assert_eq!(&records[1][1], "10.0");
}

#[test]
fn absent_metrics_are_empty_cells() {
    let dir = tempfile::tempdir().unwrap();
    let json = write_results(&dir);

    let rows = parse_layouts(&json, &FrequencyTable::new()).unwrap();
    let cheapest = &rows[0];

    assert_eq!(cheapest.get("Cluster Rolls"), "1.5");
    assert_eq!(cheapest.get("Scissoring"), "");
    assert_eq!(cheapest.get("Key Costs"), "");
    assert_eq!(cheapest.get("Hands Disbalance"), "");
}

#[test]
fn cleaned_messages_land_in_their_columns() {
    let dir = tempfile::tempdir().unwrap();
    let json = write_results(&dir);

    let rows = parse_layouts(&json, &FrequencyTable::new()).unwrap();
    let costly = &rows[1];

    assert_eq!(costly.get("Hands Disbalance"), "48.3 - 51.7");
    assert_eq!(costly.get("Scissoring"), "2.25");
    assert_eq!(costly.get("Scissoring Worst"), "th (4.32%), he (3.1%)");
}

#[test]
fn corpus_enrichment_annotates_scissoring_and_cluster_rolls() {
    let dir = tempfile::tempdir().unwrap();
    let json = write_results(&dir);

    let mut frequencies = FrequencyTable::new();
    frequencies.insert("th".to_string(), 3.556);

    let rows = parse_layouts(&json, &frequencies).unwrap();

    assert_eq!(
        rows[1].get("Scissoring Worst"),
        "th (4.32%, freq: 3.56%), he (3.10%, freq: 0.0%)"
    );
    // Bigrams missing from the corpus enrich with freq: 0.0, never error.
    assert_eq!(rows[0].get("Cluster Rolls Worst"), "ne (2.50%, freq: 0.0%)");
}

#[test]
fn enrichment_without_corpus_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let json = write_results(&dir);

    let rows = parse_layouts(&json, &FrequencyTable::new()).unwrap();
    assert_eq!(rows[0].get("Cluster Rolls Worst"), "ne (2.5%)");
}
