//! The suggestion validator: Scout's ground-truth verification gate.
//!
//! Given a structured LLM suggestion and a repo root, [`Validator::validate`]
//! returns a [`ValidationResult`] computed entirely from the filesystem --
//! no network calls, target latency under 10ms. The pipeline is an ordered
//! sequence of gates, each strictly cheaper than the next; the first
//! failed gate determines the `error_code`. Validation failure is data,
//! never an `Err` -- `validate` cannot fail.

mod levenshtein;

use crate::fs::FileSystem;
use crate::symbols;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Minimum self-declared confidence a suggestion must carry before the
/// validator will touch the filesystem.
const CONFIDENCE_FLOOR: u8 = 70;

/// Minimum Levenshtein similarity for a candidate to be offered as an
/// alternative (file name or symbol name).
const SIMILARITY_THRESHOLD: f64 = 0.3;

/// Maximum number of alternatives returned for a single gate failure.
const MAX_ALTERNATIVES: usize = 5;

/// A structured claim about a code location, as produced by an LLM.
///
/// Every field but `confidence` is optional; absence is meaningful --
/// a missing `file`, for instance, can never resolve, so it short-circuits
/// at Gate 2 as `FILE_NOT_FOUND`.
#[derive(Debug, Clone, Deserialize)]
pub struct Suggestion {
    pub file: Option<String>,
    #[serde(alias = "function")]
    pub symbol: Option<String>,
    pub line: Option<usize>,
    #[serde(default)]
    pub confidence: u8,
}

/// The validator's verdict on a [`Suggestion`].
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub adjusted_confidence: u8,
    pub actual_file: Option<String>,
    pub actual_line: Option<usize>,
    pub symbol_snippet: Option<String>,
    pub alternatives: Vec<String>,
    pub validation_time_ms: f64,
    pub error_code: ErrorCode,
}

/// Why a suggestion was (in)valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "VALID")]
    Valid,
    #[serde(rename = "LOW_CONFIDENCE")]
    LowConfidence,
    #[serde(rename = "FILE_NOT_FOUND")]
    FileNotFound,
    #[serde(rename = "SYMBOL_NOT_FOUND")]
    SymbolNotFound,
    #[serde(rename = "LINE_MISMATCH")]
    LineMismatch,
    #[serde(rename = "SYMLINK_LOOP")]
    SymlinkLoop,
    #[serde(rename = "IO_ERROR")]
    IoError,
}

/// Validates suggestions against the filesystem rooted at `repo_root`.
pub struct Validator<'a> {
    fs: &'a dyn FileSystem,
    repo_root: PathBuf,
}

impl<'a> Validator<'a> {
    pub fn new(fs: &'a dyn FileSystem, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            repo_root: repo_root.into(),
        }
    }

    /// Run the full gate pipeline against `suggestion`. Never fails --
    /// every outcome, including I/O failure, is represented in the
    /// returned `ValidationResult`.
    pub fn validate(&self, suggestion: &Suggestion) -> ValidationResult {
        let start = Instant::now();

        // Gate 1 -- confidence floor. No filesystem access above this line.
        if suggestion.confidence < CONFIDENCE_FLOOR {
            return self.finish(
                start,
                false,
                suggestion.confidence,
                None,
                None,
                None,
                Vec::new(),
                ErrorCode::LowConfidence,
            );
        }

        // Gate 2 -- path resolution, symlink-loop detection, existence.
        let Some(claimed_file) = suggestion.file.as_deref() else {
            return self.finish(
                start,
                false,
                suggestion.confidence,
                None,
                None,
                None,
                Vec::new(),
                ErrorCode::FileNotFound,
            );
        };

        let resolution = self.resolve_claimed_file(claimed_file);
        let resolved_path = match resolution {
            ResolveOutcome::SymlinkLoop => {
                return self.finish(
                    start,
                    false,
                    suggestion.confidence,
                    None,
                    None,
                    None,
                    Vec::new(),
                    ErrorCode::SymlinkLoop,
                );
            }
            ResolveOutcome::NotFound {
                parent_dir,
                file_name,
            } => {
                let alternatives = self.similar_file_names(&parent_dir, &file_name);
                return self.finish(
                    start,
                    false,
                    suggestion.confidence,
                    None,
                    None,
                    None,
                    alternatives,
                    ErrorCode::FileNotFound,
                );
            }
            ResolveOutcome::Resolved(path) => path,
        };

        let content = match self.fs.read_file(&resolved_path) {
            Ok(content) => content,
            Err(_) => {
                return self.finish(
                    start,
                    false,
                    suggestion.confidence,
                    Some(resolved_path.to_string_lossy().into_owned()),
                    None,
                    None,
                    Vec::new(),
                    ErrorCode::IoError,
                );
            }
        };

        let actual_file = resolved_path.to_string_lossy().into_owned();

        // Gate 3 -- symbol presence.
        let Some(claimed_symbol) = suggestion.symbol.as_deref() else {
            return self.finish(
                start,
                false,
                suggestion.confidence,
                Some(actual_file),
                None,
                None,
                Vec::new(),
                ErrorCode::SymbolNotFound,
            );
        };

        let candidate_lines = symbols::find_definition_lines(&content, claimed_symbol);
        if candidate_lines.is_empty() {
            let alternatives = self.similar_symbol_names(&content, claimed_symbol);
            return self.finish(
                start,
                false,
                suggestion.confidence,
                Some(actual_file),
                None,
                None,
                alternatives,
                ErrorCode::SymbolNotFound,
            );
        }

        // On multiple candidate lines, report only the first -- the
        // validator does not disambiguate beyond the line-agreement check
        // in the next gate.
        let actual_line = candidate_lines[0];

        // Gate 4 -- line agreement.
        if let Some(claimed_line) = suggestion.line {
            if claimed_line != actual_line {
                let corrected = format!(
                    "{{\"file\": \"{actual_file}\", \"symbol\": \"{claimed_symbol}\", \"line\": {actual_line}, \"confidence\": {}}}",
                    suggestion.confidence
                );
                let snippet = symbols::snippet(&content, actual_line, actual_line + 2);
                return self.finish(
                    start,
                    false,
                    suggestion.confidence,
                    Some(actual_file),
                    Some(actual_line),
                    Some(snippet),
                    vec![corrected],
                    ErrorCode::LineMismatch,
                );
            }
        }

        // Success.
        let snippet = symbols::snippet(&content, actual_line, actual_line + 2);
        self.finish(
            start,
            true,
            suggestion.confidence,
            Some(actual_file),
            Some(actual_line),
            Some(snippet),
            Vec::new(),
            ErrorCode::Valid,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        start: Instant,
        is_valid: bool,
        adjusted_confidence: u8,
        actual_file: Option<String>,
        actual_line: Option<usize>,
        symbol_snippet: Option<String>,
        alternatives: Vec<String>,
        error_code: ErrorCode,
    ) -> ValidationResult {
        ValidationResult {
            is_valid,
            adjusted_confidence,
            actual_file,
            actual_line,
            symbol_snippet,
            alternatives,
            validation_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            error_code,
        }
    }

    /// Resolve `claimed` against `repo_root`, following any symlink chain
    /// and detecting cycles via a visited set.
    fn resolve_claimed_file(&self, claimed: &str) -> ResolveOutcome {
        let start_path = self.join_repo_root(claimed);
        let mut current = start_path;
        let mut visited: HashSet<PathBuf> = HashSet::new();

        loop {
            if !visited.insert(current.clone()) {
                return ResolveOutcome::SymlinkLoop;
            }
            if !self.fs.is_symlink(&current) {
                break;
            }
            let Some(target) = self.fs.read_link(&current) else {
                break;
            };
            current = if target.is_absolute() {
                target
            } else {
                current
                    .parent()
                    .unwrap_or(&self.repo_root)
                    .join(target)
            };
        }

        if self.fs.exists(&current) {
            ResolveOutcome::Resolved(current)
        } else {
            let parent_dir = current
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.repo_root.clone());
            let file_name = current
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ResolveOutcome::NotFound {
                parent_dir,
                file_name,
            }
        }
    }

    fn join_repo_root(&self, claimed: &str) -> PathBuf {
        let path = Path::new(claimed);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.repo_root.join(path)
        }
    }

    /// Up to [`MAX_ALTERNATIVES`] repo-relative file names in `parent_dir`
    /// whose Levenshtein similarity to `claimed_name` clears
    /// [`SIMILARITY_THRESHOLD`], ordered by descending similarity.
    fn similar_file_names(&self, parent_dir: &Path, claimed_name: &str) -> Vec<String> {
        let mut scored: Vec<(f64, String)> = self
            .fs
            .read_dir(parent_dir)
            .into_iter()
            .filter_map(|name| {
                let score = levenshtein::similarity(claimed_name, &name);
                (score > SIMILARITY_THRESHOLD).then(|| (score, name))
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap().then_with(|| a.1.cmp(&b.1)));

        scored
            .into_iter()
            .take(MAX_ALTERNATIVES)
            .map(|(_, name)| {
                let candidate = parent_dir.join(&name);
                self.relative_to_repo_root(&candidate)
            })
            .collect()
    }

    /// Up to [`MAX_ALTERNATIVES`] symbol names in `content` whose
    /// Levenshtein similarity to `claimed_symbol` clears
    /// [`SIMILARITY_THRESHOLD`], ordered by descending similarity, phrased
    /// as retry-ready suggestion strings.
    fn similar_symbol_names(&self, content: &str, claimed_symbol: &str) -> Vec<String> {
        let mut scored: Vec<(f64, String)> = symbols::all_definition_names(content)
            .into_iter()
            .filter(|name| name != claimed_symbol)
            .map(|name| {
                let score = levenshtein::similarity(claimed_symbol, &name);
                (score, name)
            })
            .filter(|(score, _)| *score > SIMILARITY_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap().then_with(|| a.1.cmp(&b.1)));
        scored.dedup_by(|a, b| a.1 == b.1);

        scored
            .into_iter()
            .take(MAX_ALTERNATIVES)
            .map(|(_, name)| format!("did you mean symbol \"{name}\"?"))
            .collect()
    }

    fn relative_to_repo_root(&self, path: &Path) -> String {
        path.strip_prefix(&self.repo_root)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }
}

enum ResolveOutcome {
    Resolved(PathBuf),
    SymlinkLoop,
    NotFound {
        parent_dir: PathBuf,
        file_name: String,
    },
}
