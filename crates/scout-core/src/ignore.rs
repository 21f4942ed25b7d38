//! Gitignore-style ignore-pattern matcher.
//!
//! Resolves whether a path participates in Scout processing at all, using
//! built-in rules plus user patterns loaded from a `.livingDocIgnore` file
//! in the repository root.
//!
//! Matching proceeds in three ordered passes over compiled regex lists:
//! built-ins (if any match, ignored, full stop), then positive user
//! patterns (mark ignored), then negative user patterns (`!`-prefixed;
//! negation wins and clears the mark). Both the absolute normalized path
//! and the repo-relative path are tested against every pattern.

use regex::Regex;
use std::path::{Path, PathBuf};

/// Patterns that are always ignored, regardless of user configuration.
const BUILTIN_PATTERNS: &[&str] = &[
    r"(^|/)\.git(/|$)",
    r"(^|/)node_modules(/|$)",
    r"(^|/)target(/|$)",
    r"(^|/)\.venv(/|$)",
    r"(^|/)venv(/|$)",
    r"(^|/)__pycache__(/|$)",
    r"(^|/)\.scout(/|$)",
    r"\.pyc$",
];

/// A set of compiled ignore rules: built-ins plus user patterns loaded
/// from `.livingDocIgnore`.
///
/// Patterns are compiled once at load time, never on a per-call basis --
/// `matches` only runs the already-compiled regexes against a path.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    builtins: Vec<Regex>,
    positive: Vec<Regex>,
    negative: Vec<Regex>,
}

impl IgnoreSet {
    /// Build an `IgnoreSet` containing only the built-in patterns.
    pub fn builtins_only() -> Self {
        Self {
            builtins: BUILTIN_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("builtin pattern must compile"))
                .collect(),
            positive: Vec::new(),
            negative: Vec::new(),
        }
    }

    /// Load user patterns from `<repo_root>/.livingDocIgnore`, falling
    /// back silently to built-ins only if the file does not exist or
    /// cannot be read -- a missing or unreadable ignore file is never a
    /// hard failure.
    pub fn load(repo_root: &Path) -> Self {
        let mut set = Self::builtins_only();
        set.reload(repo_root);
        set
    }

    /// Re-read `.livingDocIgnore` from `repo_root`, atomically replacing
    /// the compiled positive/negative pattern lists. Built-ins are
    /// untouched.
    pub fn reload(&mut self, repo_root: &Path) {
        let ignore_file = repo_root.join(".livingDocIgnore");
        let (positive, negative) = match std::fs::read_to_string(&ignore_file) {
            Ok(contents) => parse_ignore_file(&contents),
            Err(_) => (Vec::new(), Vec::new()),
        };
        self.positive = positive;
        self.negative = negative;
    }

    /// Decide whether `path` is ignored for Scout processing.
    ///
    /// `path` is normalized (forward slashes, `~` expanded, resolved
    /// against `repo_root` if relative) before matching. Both the
    /// absolute normalized path and the path relative to `repo_root` are
    /// tested against every compiled pattern.
    pub fn matches(&self, path: &Path, repo_root: &Path) -> bool {
        let absolute = normalize(path, repo_root);
        let relative = relative_to(&absolute, repo_root);

        let candidates: [&str; 2] = [
            absolute.to_string_lossy().as_ref(),
            relative.to_string_lossy().as_ref(),
        ];

        if self
            .builtins
            .iter()
            .any(|re| candidates.iter().any(|c| re.is_match(c)))
        {
            return true;
        }

        let mut ignored = self
            .positive
            .iter()
            .any(|re| candidates.iter().any(|c| re.is_match(c)));

        if ignored
            && self
                .negative
                .iter()
                .any(|re| candidates.iter().any(|c| re.is_match(c)))
        {
            ignored = false;
        }

        ignored
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::builtins_only()
    }
}

/// Parse a `.livingDocIgnore` file into compiled positive/negative pattern
/// lists. Blank lines and `#`-prefixed comments are skipped. A line
/// beginning with `!` is a negative pattern (the `!` is stripped before
/// compilation).
fn parse_ignore_file(contents: &str) -> (Vec<Regex>, Vec<Regex>) {
    let mut positive = Vec::new();
    let mut negative = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(pattern) = line.strip_prefix('!') {
            if let Some(re) = compile_glob(pattern) {
                negative.push(re);
            }
        } else if let Some(re) = compile_glob(line) {
            positive.push(re);
        }
    }

    (positive, negative)
}

/// Compile a single glob pattern into an anchored regex.
///
/// Grammar: `*` matches any run of characters except `/`; `**` matches
/// zero or more path segments (including the separators); `?` matches
/// exactly one character; every other character is matched literally.
pub(crate) fn compile_glob(pattern: &str) -> Option<Regex> {
    let mut regex_src = String::from("^");
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    regex_src.push_str(".*");
                    i += 2;
                } else {
                    regex_src.push_str("[^/]*");
                    i += 1;
                }
            }
            '?' => {
                regex_src.push_str("[^/]");
                i += 1;
            }
            c => {
                regex_src.push_str(&regex::escape(&c.to_string()));
                i += 1;
            }
        }
    }
    regex_src.push('$');
    Regex::new(&regex_src).ok()
}

/// Normalize a path: convert backslashes to forward slashes, expand a
/// leading `~`, and resolve against `repo_root` if relative.
fn normalize(path: &Path, repo_root: &Path) -> PathBuf {
    let raw = path.to_string_lossy().replace('\\', "/");
    let expanded = if let Some(rest) = raw.strip_prefix("~/") {
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(rest),
            None => PathBuf::from(raw.clone()),
        }
    } else {
        PathBuf::from(raw)
    };

    if expanded.is_absolute() {
        expanded
    } else {
        repo_root.join(expanded)
    }
}

fn relative_to(absolute: &Path, repo_root: &Path) -> PathBuf {
    absolute
        .strip_prefix(repo_root)
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|_| absolute.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn builtin_pattern_ignores_regardless_of_user_patterns() {
        let set = IgnoreSet::builtins_only();
        let root = Path::new("/repo");
        assert!(set.matches(Path::new("node_modules/x.js"), root));
        assert!(set.matches(Path::new(".git/HEAD"), root));
    }

    #[test]
    fn empty_ignore_file_means_only_builtins_apply() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".livingDocIgnore"), "").unwrap();
        let set = IgnoreSet::load(temp.path());
        assert!(!set.matches(Path::new("src/foo.py"), temp.path()));
        assert!(set.matches(Path::new("node_modules/x.js"), temp.path()));
    }

    #[test]
    fn positive_pattern_matches_glob_star() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".livingDocIgnore"), "*.log\n").unwrap();
        let set = IgnoreSet::load(temp.path());
        assert!(set.matches(Path::new("debug.log"), temp.path()));
        assert!(!set.matches(Path::new("debug.log.txt"), temp.path()));
    }

    #[test]
    fn double_star_matches_any_depth() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".livingDocIgnore"), "build/**\n").unwrap();
        let set = IgnoreSet::load(temp.path());
        assert!(set.matches(Path::new("build/a/b/c.txt"), temp.path()));
    }

    #[test]
    fn negation_clears_positive_match() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".livingDocIgnore"),
            "*.md\n!README.md\n",
        )
        .unwrap();
        let set = IgnoreSet::load(temp.path());
        assert!(set.matches(Path::new("notes.md"), temp.path()));
        assert!(!set.matches(Path::new("README.md"), temp.path()));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".livingDocIgnore"),
            "# a comment\n\n*.tmp\n",
        )
        .unwrap();
        let set = IgnoreSet::load(temp.path());
        assert!(set.matches(Path::new("x.tmp"), temp.path()));
    }

    #[test]
    fn missing_ignore_file_falls_back_to_builtins_only() {
        let temp = TempDir::new().unwrap();
        let set = IgnoreSet::load(temp.path());
        assert!(!set.matches(Path::new("src/anything.py"), temp.path()));
    }

    #[test]
    fn question_mark_matches_exactly_one_char() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".livingDocIgnore"), "file?.txt\n").unwrap();
        let set = IgnoreSet::load(temp.path());
        assert!(set.matches(Path::new("file1.txt"), temp.path()));
        assert!(!set.matches(Path::new("file12.txt"), temp.path()));
    }

    #[test]
    fn reload_replaces_patterns_atomically() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".livingDocIgnore"), "*.a\n").unwrap();
        let mut set = IgnoreSet::load(temp.path());
        assert!(set.matches(Path::new("x.a"), temp.path()));

        std::fs::write(temp.path().join(".livingDocIgnore"), "*.b\n").unwrap();
        set.reload(temp.path());
        assert!(!set.matches(Path::new("x.a"), temp.path()));
        assert!(set.matches(Path::new("x.b"), temp.path()));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn matches_never_panics(path in "[a-zA-Z0-9_./-]{0,40}") {
            let set = IgnoreSet::builtins_only();
            let _ = set.matches(Path::new(&path), Path::new("/repo"));
        }

        #[test]
        fn negating_every_positive_pattern_clears_the_match(name in "[a-zA-Z0-9_]{1,12}") {
            let filename = format!("{name}.md");
            let positive = compile_glob("*.md");
            let negative = compile_glob(&filename);
            prop_assume!(positive.is_some() && negative.is_some());

            let set = IgnoreSet {
                builtins: Vec::new(),
                positive: vec![positive.unwrap()],
                negative: vec![negative.unwrap()],
            };

            prop_assert!(!set.matches(Path::new(&filename), Path::new("/repo")));
        }
    }
}
