use crate::error::RpResult;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Glyph marking an unused key slot in rendered diagrams.
pub const PLACEHOLDER_GLYPH: char = '□';

/// Width of the virtual console buffer, in character cells.
const CONSOLE_COLUMNS: usize = 64;

/// Square character cell edge, in px. Doubles as the font size so the cell
/// aspect ratio stays 1.
const CELL: usize = 14;
const PADDING: usize = 8;
const BASELINE: usize = 11;

const BACKGROUND: &str = "#0d1117";
const FG_PLAIN: &str = "#c9d1d9";
const FG_LETTER: &str = "#e3b341";
const FG_PLACEHOLDER: &str = "#6e7681";

/// A layout whose diagram was rendered to disk; consumed later to embed the
/// image in the markdown report.
#[derive(Debug, Clone)]
pub struct GeneratedLayout {
    pub layout_string: String,
    pub svg_path: PathBuf,
}

/// Style class of one diagram character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphClass {
    /// The unused-slot marker, rendered muted.
    Placeholder,
    /// Alphabetic characters, rendered highlighted.
    Letter,
    /// Everything else (digits, punctuation, whitespace), rendered plain.
    Plain,
}

pub fn classify(c: char) -> GlyphClass {
    if c == PLACEHOLDER_GLYPH {
        GlyphClass::Placeholder
    } else if c.is_alphabetic() {
        GlyphClass::Letter
    } else {
        GlyphClass::Plain
    }
}

fn fill_for(class: GlyphClass) -> &'static str {
    match class {
        GlyphClass::Placeholder => FG_PLACEHOLDER,
        GlyphClass::Letter => FG_LETTER,
        GlyphClass::Plain => FG_PLAIN,
    }
}

/// Renders a character grid into a terminal-styled SVG document.
///
/// Pure function of its input: a fixed-width console backdrop with one text
/// row per diagram line, no title text, square cells. Lines longer than the
/// buffer width are truncated.
pub fn render_svg(lines: &[String]) -> String {
    let width = CONSOLE_COLUMNS * CELL + PADDING * 2;
    let height = lines.len() * CELL + PADDING * 2;

    let mut out = String::new();
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height,
    );
    let _ = writeln!(
        out,
        r#"  <rect width="{}" height="{}" fill="{}" rx="8"/>"#,
        width, height, BACKGROUND
    );
    let _ = writeln!(
        out,
        r#"  <g xml:space="preserve" font-family="ui-monospace, monospace" font-size="{}">"#,
        CELL
    );

    for (row, line) in lines.iter().enumerate() {
        let y = PADDING + row * CELL + BASELINE;
        for run in runs(line) {
            let x = PADDING + run.start * CELL;
            let _ = writeln!(
                out,
                r#"    <text x="{}" y="{}" fill="{}" textLength="{}" lengthAdjust="spacingAndGlyphs">{}</text>"#,
                x,
                y,
                fill_for(run.class),
                run.text.chars().count() * CELL,
                xml_escape(&run.text),
            );
        }
    }

    let _ = writeln!(out, "  </g>");
    let _ = writeln!(out, "</svg>");
    out
}

/// Renders the grid and writes it to `path`.
pub fn export_svg(lines: &[String], path: &Path) -> RpResult<()> {
    fs::write(path, render_svg(lines))?;
    Ok(())
}

struct Run {
    start: usize,
    class: GlyphClass,
    text: String,
}

/// Maximal same-class character runs of one line, whitespace-only runs
/// dropped (the explicit x position already accounts for them).
fn runs(line: &str) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();

    for (col, c) in line.chars().take(CONSOLE_COLUMNS).enumerate() {
        let class = classify(c);
        if let Some(run) = runs.last_mut() {
            if run.class == class {
                run.text.push(c);
                continue;
            }
        }
        runs.push(Run {
            start: col,
            class,
            text: c.to_string(),
        });
    }

    runs.retain(|run| !run.text.trim().is_empty());
    runs
}

/// Escape the XML special characters for safe embedding in text content.
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
