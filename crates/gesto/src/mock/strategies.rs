//! Proptest strategies for upload testing
//!
//! Generates MIME types, file descriptors and accept constraints so
//! properties of the matcher and the orchestrator can be checked against
//! [`MockDocument`](super::MockDocument).
//!
//! ```rust,ignore
//! proptest! {
//!     #[test]
//!     fn prop_disabled_never_mutates(files in file_batch(0..6)) {
//!         let mut harness = UploadHarness::single_input(&[("disabled", "")]);
//!         harness.upload(files);
//!         harness.assert_no_mutation();
//!     }
//! }
//! ```

use crate::file::FileDescriptor;
use proptest::prelude::*;
use std::ops::Range;

const TYPES: [&str; 5] = ["image", "audio", "video", "text", "application"];

/// A well-formed `type/subtype`
pub fn any_mime_type() -> impl Strategy<Value = String> {
    (prop::sample::select(TYPES.to_vec()), "[a-z][a-z0-9.+-]{0,10}")
        .prop_map(|(kind, sub)| format!("{kind}/{sub}"))
}

/// A file with a plausible name, well-formed MIME type and short contents
pub fn any_file_descriptor() -> impl Strategy<Value = FileDescriptor> {
    (
        "[a-zA-Z0-9_-]{1,12}",
        "[a-z0-9]{1,4}",
        any_mime_type(),
        prop::collection::vec(any::<u8>(), 0..16),
    )
        .prop_map(|(stem, ext, mime, contents)| {
            FileDescriptor::new(format!("{stem}.{ext}"), mime, contents)
        })
}

/// A batch of files, duplicates allowed
pub fn file_batch(len: Range<usize>) -> impl Strategy<Value = Vec<FileDescriptor>> {
    prop::collection::vec(any_file_descriptor(), len)
}

/// A well-formed accept constraint of one to three segments
pub fn accept_constraint() -> impl Strategy<Value = String> {
    let segment = prop_oneof![
        any_mime_type(),
        prop::sample::select(TYPES.to_vec()).prop_map(|kind| format!("{kind}/*")),
        "[a-z0-9]{1,4}".prop_map(|ext| format!(".{ext}")),
    ];
    prop::collection::vec(segment, 1..4).prop_map(|segments| segments.join(","))
}

/// Edge-case constraints that must all degrade to accept-all
#[must_use]
pub fn malformed_constraints() -> Vec<&'static str> {
    vec!["", " ", ",", " , ,", "garbage", "/*", ".", "image/", "/png"]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accept::{parse, AcceptFilter};

    #[test]
    fn test_malformed_constraints_accept_all() {
        let file = FileDescriptor::new("x.bin", "application/octet-stream", vec![]);
        for raw in malformed_constraints() {
            let filter = AcceptFilter::from_attribute(Some(raw));
            assert!(filter.is_accept_all(), "{raw:?} should parse to nothing");
            assert!(filter.accepts(&file));
        }
    }

    proptest! {
        #[test]
        fn prop_generated_constraints_parse_fully(raw in accept_constraint()) {
            prop_assert_eq!(parse(&raw).len(), raw.split(',').count());
        }
    }
}
