use crate::error::{ReportError, RpResult};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Line prefix delimiting per-layout sections of the optimizer's text log.
const SECTION_MARKER: &str = "Layout (layer 1):";

/// Substring ending a diagram body and introducing the layout identifier.
const LAYOUT_STRING_MARKER: &str = "Layout string";

/// One rendered layout pulled out of the text log: the canonical identifier
/// and the diagram's character grid, ready for SVG rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDiagram {
    pub layout_string: String,
    pub lines: Vec<String>,
}

/// `Layout string (layer 1):` followed by the identifier on its own line.
fn layout_string_re() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Layout string \(layer 1\):\n(.+)").unwrap())
}

/// Reads the companion text log and extracts every layout diagram from it.
pub fn load_diagrams(txt_file: &Path) -> RpResult<Vec<LayoutDiagram>> {
    if !txt_file.exists() {
        return Err(ReportError::MissingInput(format!(
            "Results file not found: {}",
            txt_file.display()
        )));
    }
    let content = fs::read_to_string(txt_file)?;
    Ok(extract_diagrams(&content))
}

/// Splits the log into sections and keeps every one that carries both a
/// layout identifier and a non-empty diagram body. Sections missing either
/// are silently skipped.
pub fn extract_diagrams(content: &str) -> Vec<LayoutDiagram> {
    split_sections(content)
        .iter()
        .filter_map(|section| {
            let caps = layout_string_re().captures(section)?;
            let layout_string = caps[1].trim().to_string();

            let lines = diagram_lines(section);
            if lines.is_empty() {
                return None;
            }

            Some(LayoutDiagram {
                layout_string,
                lines,
            })
        })
        .collect()
}

/// Consecutive sections each beginning at a marker line; the first section
/// may lack the marker (log preamble).
fn split_sections(content: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.split('\n') {
        if line.starts_with(SECTION_MARKER) && !current.is_empty() {
            sections.push(current.join("\n"));
            current = vec![line];
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        sections.push(current.join("\n"));
    }

    sections
}

/// Every non-blank line strictly between the section marker and the layout
/// string marker. No marker line in the section means no diagram.
fn diagram_lines(section: &str) -> Vec<String> {
    let lines: Vec<&str> = section.split('\n').collect();
    let Some(start) = lines.iter().position(|line| line.contains(SECTION_MARKER)) else {
        return Vec::new();
    };

    let mut body = Vec::new();
    for line in &lines[start + 1..] {
        if line.contains(LAYOUT_STRING_MARKER) {
            break;
        }
        if !line.trim().is_empty() {
            body.push((*line).to_string());
        }
    }
    body
}
