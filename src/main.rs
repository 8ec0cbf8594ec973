use clap::Parser;
use keyreport::corpus::{self, FrequencyTable};
use keyreport::diagram;
use keyreport::error::{ReportError, RpResult};
use keyreport::reports;
use keyreport::results;
use keyreport::svg::{self, GeneratedLayout};
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Parse keyboard layout optimization results and generate CSV, SVG and markdown outputs.",
    long_about = None
)]
struct Cli {
    /// JSON file with optimization results
    json_file: PathBuf,

    /// Output directory (default: derived from the input file name)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Name of the corpus for bigram frequencies
    #[arg(short, long)]
    corpus: Option<String>,

    /// Root directory holding per-corpus ngram folders
    #[arg(long, default_value = "ngrams")]
    ngrams_dir: PathBuf,
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("❌ {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> RpResult<()> {
    if !cli.json_file.is_file() {
        return Err(ReportError::InvalidArgument(format!(
            "Results file not found: {}",
            cli.json_file.display()
        )));
    }

    let frequencies: FrequencyTable = match &cli.corpus {
        Some(name) => {
            corpus::validate_corpus(&cli.ngrams_dir, name)?;
            corpus::load_bigram_frequencies(&cli.ngrams_dir, name)?
        }
        None => FrequencyTable::new(),
    };

    let txt_file = cli.json_file.with_extension("txt");
    let (output_dir, output_base) = resolve_output(cli);
    fs::create_dir_all(&output_dir)?;

    let records = results::parse_layouts(&cli.json_file, &frequencies)?;

    let csv_file = output_dir.join(format!("{}.csv", output_base));
    info!("📊 Generating CSV: {}", csv_file.display());
    reports::export_csv(&records, &csv_file)?;

    if txt_file.exists() {
        info!(
            "📜 Found {}, generating SVG files and markdown table...",
            txt_file.display()
        );

        let svg_dir = output_dir.join("svgs");
        fs::create_dir_all(&svg_dir)?;

        let diagrams = diagram::load_diagrams(&txt_file)?;
        let mut generated_layouts = Vec::with_capacity(diagrams.len());
        for layout_diagram in &diagrams {
            let svg_path = svg_dir.join(format!("{}.svg", layout_diagram.layout_string));
            svg::export_svg(&layout_diagram.lines, &svg_path)?;
            info!("🖼️  Generated: {}", svg_path.display());
            generated_layouts.push(GeneratedLayout {
                layout_string: layout_diagram.layout_string.clone(),
                svg_path,
            });
        }

        let markdown_file = output_dir.join(format!("{}.md", output_base));
        info!("📝 Generating markdown table: {}", markdown_file.display());
        reports::export_markdown(&records, &generated_layouts, &markdown_file)?;
    }

    reports::print_summary(&records);
    Ok(())
}

/// Output directory and artifact base name: an explicit `--out` directory
/// names both; otherwise both derive from the input file stem.
fn resolve_output(cli: &Cli) -> (PathBuf, String) {
    match &cli.out {
        Some(dir) => {
            let base = dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "results".to_string());
            (dir.clone(), base)
        }
        None => {
            let stem = cli
                .json_file
                .file_stem()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "results".to_string());
            (PathBuf::from(format!("{}_layouts", stem)), stem)
        }
    }
}
