//! CLI-specific output formats
//!
//! Parsed sections and generated statutes each have a fixed set of named output
//! formats. Anything that is not plain text goes through the library's snapshot
//! and treeviz formatters or `serde_json`.

use serde_json::json;
use statprobe_parser::statute::formats::{snapshot_tree, to_json, to_treeviz};
use statprobe_parser::statute::synthetic::{RenderStyle, SyntheticRenderer};
use statprobe_parser::statute::uslm::ParsedSection;
use statprobe_parser::statute::StatuteTree;

/// Output formats for parsed USLM sections
pub const SECTION_FORMATS: &[&str] = &["text", "lines", "leaves", "treeviz", "json"];

/// Output styles for generated statutes
pub const GENERATE_STYLES: &[&str] = &["statute", "compact", "sentences", "citations", "treeviz", "json"];

/// Format one parsed section
pub fn format_section(section: &ParsedSection, format: &str) -> Result<String, String> {
    match format {
        "text" => Ok(section.render()),
        "lines" => Ok(section
            .statlines
            .iter()
            .enumerate()
            .map(|(idx, line)| format!("{idx}\t{}\t{}\n", line.identifier, line.indented()))
            .collect()),
        "leaves" => Ok(section
            .leaves
            .iter()
            .filter_map(|leaf| section.leaf_line(leaf))
            .map(|line| {
                let cite = line.citation().map(|c| c.to_string()).unwrap_or_default();
                format!("{cite}\t{}\n", line.text)
            })
            .collect()),
        "treeviz" => Ok(to_treeviz(&section.tree)),
        "json" => {
            let value = json!({
                "identifier": section.identifier,
                "statlines": section.statlines,
                "leaves": section.leaves.iter().map(|leaf| leaf.line).collect::<Vec<_>>(),
                "tree": snapshot_tree(&section.tree),
            });
            serde_json::to_string_pretty(&value)
                .map(|s| s + "\n")
                .map_err(|e| format!("JSON serialization failed: {}", e))
        }
        other => Err(format!(
            "Format '{}' not supported for sections (available: {})",
            other,
            SECTION_FORMATS.join(", ")
        )),
    }
}

/// Render a generated tree in one of [`GENERATE_STYLES`]
///
/// `citations`, `treeviz` and `json` render the statute text first so the tree
/// carries its citations.
pub fn render_generated(
    tree: &mut StatuteTree,
    renderer: &SyntheticRenderer,
    style: &str,
) -> Result<String, String> {
    let render_err = |e: statprobe_parser::statute::RenderError| format!("Render failed: {}", e);
    match style {
        "citations" => {
            renderer.statute(tree).map_err(render_err)?;
            Ok(tree
                .iter()
                .map(|id| {
                    let node = &tree[id];
                    format!(
                        "{}\tused: {}\tdefined: {}\n",
                        node.term.as_deref().unwrap_or_default(),
                        node.cite_used.as_deref().unwrap_or("-"),
                        node.cite_defined.as_deref().unwrap_or("-"),
                    )
                })
                .collect())
        }
        "treeviz" => {
            renderer.statute(tree).map_err(render_err)?;
            Ok(to_treeviz(tree))
        }
        "json" => {
            renderer.statute(tree).map_err(render_err)?;
            to_json(tree)
                .map(|s| s + "\n")
                .map_err(|e| format!("JSON serialization failed: {}", e))
        }
        other => {
            let style: RenderStyle = other.parse().map_err(|_| {
                format!(
                    "Style '{}' not supported (available: {})",
                    other,
                    GENERATE_STYLES.join(", ")
                )
            })?;
            renderer.render(style, tree).map_err(render_err)
        }
    }
}
