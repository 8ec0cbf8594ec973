use crate::results::NormalizedRow;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

/// Prints a compact scoring overview of the normalized rows to stdout.
pub fn print_summary(records: &[NormalizedRow]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Layout").add_attribute(Attribute::Bold),
        Cell::new("Total").fg(Color::Cyan),
        Cell::new("Rolls"),
        Cell::new("Scis"),
        Cell::new("Keys"),
        Cell::new("Move"),
    ]);

    for i in 1..=5 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for rec in records {
        table.add_row(vec![
            Cell::new(&rec.layout).add_attribute(Attribute::Bold),
            Cell::new(rec.get("Total Cost")).fg(Color::Cyan),
            Cell::new(rec.get("Cluster Rolls")),
            Cell::new(rec.get("Scissoring")),
            Cell::new(rec.get("Key Costs")),
            Cell::new(rec.get("Movement Pattern")),
        ]);
    }

    println!("\n{}", table);
}
