//! In-memory document for driving uploads without a browser
//!
//! [`MockDocument`] implements [`Document`](crate::Document) over a small
//! element tree, records every dispatched event and runs registered
//! listeners along the propagation path. [`UploadHarness`] wraps it with the
//! usual fixtures.
//!
//! ## Example
//!
//! ```rust
//! use gesto::mock::UploadHarness;
//! use gesto::FileDescriptor;
//!
//! let mut harness = UploadHarness::labelled_input(&[("accept", "image/*")]);
//! harness.upload(FileDescriptor::png("hello.png", b"hello".to_vec()));
//! harness.assert_files(&["hello.png"]);
//! ```

pub mod document;
#[cfg(any(test, feature = "proptest"))]
pub mod strategies;
pub mod test_harness;

pub use document::{EventRecord, ListenerFn, MockDocument};
#[cfg(any(test, feature = "proptest"))]
pub use strategies::{accept_constraint, any_file_descriptor, any_mime_type, file_batch};
pub use test_harness::{EventAssertion, UploadHarness};
