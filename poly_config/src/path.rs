//! Path lexing and canonical addressing into configuration trees.
//!
//! Every source (files, environment variables, schema path overrides) runs
//! its keys through the same [`PathLexer`], so `healthMultiplier`,
//! `health_multiplier`, `HEALTH_MULTIPLIER` and `health-multiplier` all land on
//! the canonical segment `health-multiplier`.

use std::fmt;

/// Default separator between segments of a compound key.
pub const DEFAULT_PATH_SEPARATOR: char = '.';

/// Normalize a single key segment into its canonical kebab-case form.
///
/// Word boundaries are `-`, `_`, whitespace and lower-to-upper case changes
/// (`fooBar`) or the end of an upper-case run followed by a lower-case letter
/// (`HTTPServer`). The result is lower-case with single `-` separators and no
/// leading or trailing separator. The function is total and deterministic.
///
/// # Examples
///
/// ```rust
/// use poly_config::normalize_segment;
///
/// assert_eq!(normalize_segment("healthMultiplier"), "health-multiplier");
/// assert_eq!(normalize_segment("HEALTH_MULTIPLIER"), "health-multiplier");
/// assert_eq!(normalize_segment("health-multiplier"), "health-multiplier");
/// ```
#[must_use]
pub fn normalize_segment(segment: &str) -> String {
    let chars: Vec<char> = segment.trim().chars().collect();
    let mut out = String::with_capacity(segment.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if matches!(ch, '-' | '_') || ch.is_whitespace() {
            push_boundary(&mut out);
            continue;
        }
        if ch.is_uppercase() {
            let prev = i.checked_sub(1).and_then(|p| chars.get(p));
            let next = chars.get(i + 1);
            let after_lower = prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            let run_end =
                prev.is_some_and(|p| p.is_uppercase()) && next.is_some_and(|n| n.is_lowercase());
            if after_lower || run_end {
                push_boundary(&mut out);
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn push_boundary(out: &mut String) {
    if !out.is_empty() && !out.ends_with('-') {
        out.push('-');
    }
}

/// Splits raw keys into canonical path segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathLexer {
    separator: char,
}

impl Default for PathLexer {
    fn default() -> Self {
        Self {
            separator: DEFAULT_PATH_SEPARATOR,
        }
    }
}

impl PathLexer {
    /// Create a lexer splitting compound keys on `separator`.
    #[must_use]
    pub const fn new(separator: char) -> Self {
        Self { separator }
    }

    /// Separator used between segments of a compound key.
    #[must_use]
    pub const fn separator(&self) -> char {
        self.separator
    }

    /// Split `raw_key` on the separator and normalize every segment.
    ///
    /// Segments that normalize to nothing are dropped, so `"a..b"` and
    /// `"a.b"` produce the same tokens. An empty result means the key had no
    /// addressable content.
    #[must_use]
    pub fn tokenize(&self, raw_key: &str) -> Vec<String> {
        raw_key
            .split(self.separator)
            .map(normalize_segment)
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    /// Normalize a single segment. See [`normalize_segment`].
    #[must_use]
    pub fn normalize(&self, segment: &str) -> String {
        normalize_segment(segment)
    }

    /// Tokenize `raw_key` into a [`CanonicalPath`].
    #[must_use]
    pub fn path(&self, raw_key: &str) -> CanonicalPath {
        CanonicalPath::from_segments(self.tokenize(raw_key))
    }
}

/// One step of a [`CanonicalPath`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// A mapping key, already normalized.
    Key(String),
    /// A position inside a sequence.
    Index(usize),
}

/// Normalized address of a node inside a configuration tree.
///
/// Two paths are equal when their segment sequences are equal. Keys are
/// normalized on construction so comparison is insensitive to case and word
/// separators.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalPath {
    segments: Vec<PathSegment>,
}

impl CanonicalPath {
    /// The empty path addressing the tree root.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Build a path from raw key segments, normalizing each one.
    #[must_use]
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(|s| normalize_segment(s.as_ref()))
                .filter(|s| !s.is_empty())
                .map(PathSegment::Key)
                .collect(),
        }
    }

    /// Parse a dotted path such as `units.dagger.drop` with the default lexer.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        PathLexer::default().path(raw)
    }

    /// Child path for mapping key `key`.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        self.join(&Self::from_segments([key]))
    }

    /// Child path for sequence position `index`.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Concatenate `other` onto this path.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Segments of this path in order.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Key segments of this path, skipping sequence positions.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            PathSegment::Key(key) => Some(key.as_str()),
            PathSegment::Index(_) => None,
        })
    }

    /// Whether this path addresses the root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments. Same as [`Self::is_root`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
