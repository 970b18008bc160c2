//! Accept-constraint matching for file inputs.
//!
//! An `accept` attribute such as `"image/*,.pdf,text/csv"` is parsed into a
//! list of [`AcceptPattern`]s. A file passes when any pattern matches it.
//! An absent, empty or entirely malformed constraint accepts everything.

use crate::file::FileDescriptor;
use serde::{Deserialize, Serialize};

/// One entry of an accept constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcceptPattern {
    /// Full MIME type, e.g. `text/csv` (stored lower-case)
    ExactMimeType(String),
    /// Type segment of a `type/*` wildcard, e.g. `image` (stored lower-case)
    WildcardMimeType(String),
    /// File name suffix including the leading dot, e.g. `.pdf` (stored lower-case)
    Extension(String),
}

impl AcceptPattern {
    /// Classify a single trimmed segment; `None` when it is malformed
    #[must_use]
    pub fn classify(segment: &str) -> Option<Self> {
        let segment = segment.trim();
        if segment.starts_with('.') {
            return (segment.len() > 1).then(|| Self::Extension(segment.to_lowercase()));
        }
        if let Some(prefix) = segment.strip_suffix("/*") {
            return (!prefix.is_empty() && !prefix.contains('/'))
                .then(|| Self::WildcardMimeType(prefix.to_lowercase()));
        }
        match segment.split_once('/') {
            Some((kind, sub)) if !kind.is_empty() && !sub.is_empty() => {
                Some(Self::ExactMimeType(segment.to_lowercase()))
            }
            _ => None,
        }
    }

    /// Whether this pattern admits `file`
    #[must_use]
    pub fn matches(&self, file: &FileDescriptor) -> bool {
        match self {
            Self::ExactMimeType(mime) => file.mime_type().eq_ignore_ascii_case(mime),
            Self::WildcardMimeType(prefix) => {
                prefix == "*"
                    || file
                        .mime_type()
                        .split('/')
                        .next()
                        .is_some_and(|kind| kind.eq_ignore_ascii_case(prefix))
            }
            Self::Extension(ext) => file.name().to_lowercase().ends_with(ext.as_str()),
        }
    }
}

/// Parse a raw constraint into patterns, dropping malformed segments
#[must_use]
pub fn parse(constraint: &str) -> Vec<AcceptPattern> {
    constraint
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter_map(AcceptPattern::classify)
        .collect()
}

/// Whether `file` passes `patterns`; an empty pattern list accepts everything
#[must_use]
pub fn matches(file: &FileDescriptor, patterns: &[AcceptPattern]) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| p.matches(file))
}

/// A parsed constraint, reusable across many files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptFilter {
    patterns: Vec<AcceptPattern>,
}

impl AcceptFilter {
    /// Filter that accepts everything
    #[must_use]
    pub fn accept_all() -> Self {
        Self::default()
    }

    /// Parse an optional `accept` attribute value
    #[must_use]
    pub fn from_attribute(constraint: Option<&str>) -> Self {
        Self {
            patterns: constraint.map(parse).unwrap_or_default(),
        }
    }

    /// Parsed patterns
    #[must_use]
    pub fn patterns(&self) -> &[AcceptPattern] {
        &self.patterns
    }

    /// Whether no pattern restricts the selection
    #[must_use]
    pub fn is_accept_all(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether `file` passes this filter
    #[must_use]
    pub fn accepts(&self, file: &FileDescriptor) -> bool {
        matches(file, &self.patterns)
    }

    /// Split `files` into accepted and rejected, both in input order
    #[must_use]
    pub fn partition(&self, files: Vec<FileDescriptor>) -> (Vec<FileDescriptor>, Vec<FileDescriptor>) {
        files.into_iter().partition(|file| self.accepts(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: &str) -> FileDescriptor {
        FileDescriptor::new(name, mime, Vec::new())
    }

    // =========================================================================
    // H₀-ACCEPT-01: Parsing
    // =========================================================================

    #[test]
    fn h0_accept_01_parse_mixed() {
        let patterns = parse("image/*, .PDF ,text/csv");
        assert_eq!(
            patterns,
            vec![
                AcceptPattern::WildcardMimeType("image".into()),
                AcceptPattern::Extension(".pdf".into()),
                AcceptPattern::ExactMimeType("text/csv".into()),
            ]
        );
    }

    #[test]
    fn h0_accept_02_parse_empty() {
        assert!(parse("").is_empty());
        assert!(parse(" , ,").is_empty());
    }

    #[test]
    fn h0_accept_03_parse_drops_malformed_segments() {
        assert_eq!(
            parse("garbage,/*,.,image/,video/mp4"),
            vec![AcceptPattern::ExactMimeType("video/mp4".into())]
        );
    }

    #[test]
    fn h0_accept_04_parse_any_wildcard() {
        assert_eq!(parse("*/*"), vec![AcceptPattern::WildcardMimeType("*".into())]);
    }

    // =========================================================================
    // H₀-ACCEPT-05: Matching
    // =========================================================================

    #[test]
    fn h0_accept_05_exact_case_insensitive() {
        let patterns = parse("image/PNG");
        assert!(matches(&file("a.png", "image/png"), &patterns));
        assert!(!matches(&file("a.jpg", "image/jpeg"), &patterns));
    }

    #[test]
    fn h0_accept_06_wildcard_compares_type_segment_only() {
        let patterns = parse("video/*");
        assert!(matches(&file("a.mp4", "video/mp4"), &patterns));
        assert!(matches(&file("a.webm", "VIDEO/webm"), &patterns));
        assert!(!matches(&file("a.png", "image/png"), &patterns));
        assert!(!matches(&file("a.bin", "videox/raw"), &patterns));
    }

    #[test]
    fn h0_accept_07_extension_suffix() {
        let patterns = parse(".tar.gz,.PDF");
        assert!(matches(&file("backup.TAR.GZ", "application/gzip"), &patterns));
        assert!(matches(&file("report.pdf", "application/octet-stream"), &patterns));
        assert!(!matches(&file("report.pdf.txt", "text/plain"), &patterns));
    }

    #[test]
    fn h0_accept_08_filter_correctness() {
        let filter = AcceptFilter::from_attribute(Some("image/*,audio/*,text/csv"));
        let files = vec![
            file("hello.png", "image/png"),
            file("there.jpg", "audio/mp3"),
            file("there.csv", "text/csv"),
            file("there.jpg", "video/mp4"),
        ];
        let (accepted, rejected) = filter.partition(files);
        assert_eq!(accepted.len(), 3);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].mime_type(), "video/mp4");
    }

    #[test]
    fn h0_accept_09_unaccepted_format() {
        let filter = AcceptFilter::from_attribute(Some("image/jpg"));
        assert!(!filter.accepts(&file("hello.png", "image/png")));
    }

    // =========================================================================
    // H₀-ACCEPT-10: Accept-all defaults
    // =========================================================================

    #[test]
    fn h0_accept_10_absent_accepts_all() {
        let filter = AcceptFilter::from_attribute(None);
        assert!(filter.is_accept_all());
        assert!(filter.accepts(&file("x.bin", "application/octet-stream")));
    }

    #[test]
    fn h0_accept_11_malformed_accepts_all() {
        let filter = AcceptFilter::from_attribute(Some("not a mime type"));
        assert!(filter.is_accept_all());
        assert!(filter.accepts(&file("x.bin", "application/octet-stream")));
    }

    #[test]
    fn h0_accept_12_any_wildcard_accepts_everything() {
        let filter = AcceptFilter::from_attribute(Some("*/*"));
        assert!(!filter.is_accept_all());
        assert!(filter.accepts(&file("x.bin", "application/octet-stream")));
    }

    #[test]
    fn h0_accept_13_partition_keeps_order_and_duplicates() {
        let filter = AcceptFilter::from_attribute(Some(".txt"));
        let files = vec![
            file("b.txt", "text/plain"),
            file("skip.png", "image/png"),
            file("a.txt", "text/plain"),
            file("b.txt", "text/plain"),
        ];
        let (accepted, _) = filter.partition(files);
        let names: Vec<_> = accepted.iter().map(FileDescriptor::name).collect();
        assert_eq!(names, vec!["b.txt", "a.txt", "b.txt"]);
    }
}
