mod csv;
mod markdown;
mod terminal;

pub use self::csv::export_csv;
pub use self::markdown::{anchor_slug, export_markdown, METRICS_DESCRIPTION};
pub use self::terminal::print_summary;
