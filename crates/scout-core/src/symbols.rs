//! Top-level symbol extraction and source snippet retrieval.
//!
//! Extraction is a line-oriented scanner, not a full AST walk: it matches
//! the same `def <name>(` / `class <name>(` / `class <name>:` grammar
//! Gate 3 of the validator searches for (see [`crate::validator`]),
//! restricted here to definitions at zero indentation, i.e. "top-level".
//! A file that cannot be decoded, or that
//! contains no recognizable definition, yields an empty list, never a
//! hard error.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// The kind of a top-level definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Class,
}

/// A top-level definition found in a source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub line_start: usize,
    pub line_end: usize,
}

fn definition_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<indent>[ \t]*)(?P<kw>def|class)\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*(?:\(|:)")
            .expect("definition regex must compile")
    })
}

/// Enumerate top-level (zero-indentation) `def`/`class` definitions in
/// `content`, in file order. A symbol's `line_end` runs up to (but not
/// including) the next top-level definition, or to the end of the file.
pub fn extract_symbols(content: &str) -> Vec<Symbol> {
    let lines: Vec<&str> = content.lines().collect();
    let re = definition_regex();

    let headers: Vec<(usize, SymbolKind, String)> = lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            let caps = re.captures(line)?;
            if !caps["indent"].is_empty() {
                return None;
            }
            let kind = match &caps["kw"] {
                "def" => SymbolKind::Function,
                _ => SymbolKind::Class,
            };
            Some((idx + 1, kind, caps["name"].to_string()))
        })
        .collect();

    headers
        .iter()
        .enumerate()
        .map(|(i, (line_start, kind, name))| {
            let line_end = headers
                .get(i + 1)
                .map(|(next_start, _, _)| next_start - 1)
                .unwrap_or(lines.len());
            Symbol {
                name: name.clone(),
                kind: *kind,
                line_start: *line_start,
                line_end: line_end.max(*line_start),
            }
        })
        .collect()
}

/// Return the raw source lines `[line_start, line_end]` (1-based,
/// inclusive, clamped to file bounds) joined with `\n`.
pub fn snippet(content: &str, line_start: usize, line_end: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    if lines.is_empty() || line_start == 0 {
        return String::new();
    }
    let start = line_start.saturating_sub(1).min(lines.len() - 1);
    let end = line_end.min(lines.len()).max(start + 1);
    lines[start..end].join("\n")
}

/// Search `content` at any indentation for definitions of `name`,
/// returning every matching 1-based line number in file order.
///
/// This is Gate 3's grep: broader than [`extract_symbols`], which is
/// restricted to top-level definitions, since a claimed symbol may live
/// at any nesting depth.
pub(crate) fn find_definition_lines(content: &str, name: &str) -> Vec<usize> {
    let re = definition_regex();
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let caps = re.captures(line)?;
            (&caps["name"] == name).then_some(idx + 1)
        })
        .collect()
}

/// All definition names in `content`, at any indentation, in file order
/// (duplicates included). Used for Levenshtein-based "did you mean"
/// suggestions when an exact symbol search fails.
pub(crate) fn all_definition_names(content: &str) -> Vec<String> {
    let re = definition_regex();
    content
        .lines()
        .filter_map(|line| re.captures(line).map(|caps| caps["name"].to_string()))
        .collect()
}
