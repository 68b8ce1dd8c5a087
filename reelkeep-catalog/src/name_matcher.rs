//! Matching entity names against media file paths.
//!
//! Files are usually named by joining words with one separator style:
//! ```text
//! Studio.Name.Performer.Name.Scene.Title.mp4
//! performer-name_scene_title/part-1.mkv
//! ```
//!
//! A name matches a path only when it appears as a whole token: flanked on
//! both sides by the start or end of the path, a separator (`.` `-` `_`
//! space), or a directory delimiter (`/` `\`). The spaces inside a
//! multi-word name may be written with any separator. Matching ignores case.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Characters that separate words inside a file or directory name.
pub const SEPARATORS: [char; 4] = ['.', '-', '_', ' '];

/// Characters that may flank a name: word separators plus path delimiters.
const BOUNDARY_CLASS: &str = r"[.\-_ /\\]";

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("cannot match an empty name")]
    EmptyName,
    #[error("failed to compile name pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// The syntactic variants of a name that count as the same name.
///
/// Contains the original name, its lower-cased form, and the name with
/// internal spaces replaced by each separator. Duplicates are dropped, so a
/// single-word name yields at most two variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePatternSet {
    variants: Vec<String>,
}

impl NamePatternSet {
    pub fn new(name: &str) -> Self {
        let name = name.trim();
        let mut variants: Vec<String> = Vec::new();
        let mut push = |v: String| {
            if !variants.contains(&v) {
                variants.push(v);
            }
        };

        push(name.to_string());
        push(name.to_lowercase());
        for sep in SEPARATORS {
            push(name.replace(' ', &sep.to_string()));
        }

        Self { variants }
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }
}

/// A compiled matcher for one entity name.
///
/// Build it once per entity and reuse it across every path.
///
/// ```
/// use reelkeep_catalog::NameMatcher;
///
/// let m = NameMatcher::new("Foo's Bar").unwrap();
/// assert!(m.matches("aaa-Foo's-Bar-bbb.mp4"));
/// assert!(m.matches("dir/foo's.bar/aaa.mp4"));
/// assert!(!m.matches("Foo's-aaa-Bar.mp4"));
/// ```
#[derive(Debug, Clone)]
pub struct NameMatcher {
    name: String,
    patterns: NamePatternSet,
    regex: Regex,
}

impl NameMatcher {
    pub fn new(name: &str) -> Result<Self, MatchError> {
        if name.trim().is_empty() {
            return Err(MatchError::EmptyName);
        }

        let patterns = NamePatternSet::new(name);
        let alternatives = patterns
            .variants()
            .iter()
            .map(|v| regex::escape(v))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!("(?:^|{BOUNDARY_CLASS})(?:{alternatives})(?:$|{BOUNDARY_CLASS})");

        let regex = RegexBuilder::new(&pattern).case_insensitive(true).build()?;

        Ok(Self {
            name: name.trim().to_string(),
            patterns,
            regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn patterns(&self) -> &NamePatternSet {
        &self.patterns
    }

    /// Whether the name appears in `path` as a whole token.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// One-off check of a name against a path.
///
/// Empty names never match.
pub fn path_matches_name(name: &str, path: &str) -> bool {
    match NameMatcher::new(name) {
        Ok(m) => m.matches(path),
        Err(_) => false,
    }
}
