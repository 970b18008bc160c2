//! Gesto: user-interaction simulation for document trees
//!
//! Gesto (Spanish: "gesture") drives a document the way a user would: it
//! hovers, presses and clicks an element, follows labels to their controls,
//! moves focus, and assigns files to `<input type="file">` with the same
//! event order, accept filtering and single-file capping a browser applies.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       GESTO Architecture                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Upload     │    │ Label      │    │ Event      │            │
//! │   │ (files,    │───►│ Resolver   │───►│ Sequencer  │──► Document│
//! │   │  accept)   │    │            │    │ (phases)   │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine never owns a tree: everything goes through the [`Document`]
//! trait. [`mock::MockDocument`] is an in-memory implementation with
//! listeners, bubbling and an event log.
//!
//! # Example
//!
//! ```rust
//! use gesto::mock::MockDocument;
//! use gesto::{upload, Document, FileDescriptor, UploadOptions};
//!
//! let mut doc = MockDocument::new();
//! let body = doc.body();
//! let input = doc.append(body, "input", &[("type", "file"), ("accept", "image/*")]);
//!
//! let outcome = upload(
//!     &mut doc,
//!     input,
//!     FileDescriptor::png("hello.png", b"hello".to_vec()),
//!     &UploadOptions::default(),
//! )?;
//! assert!(outcome.is_committed());
//! assert_eq!(doc.files(input).names(), vec!["hello.png"]);
//! # Ok::<(), gesto::GestoError>(())
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod accept;
mod config;
mod document;
mod event;
mod file;
mod label;
/// In-memory document, test harness and property-test strategies
pub mod mock;
mod pointer;
mod result;
pub mod scenario;
mod sequencer;
mod upload;

pub use accept::{AcceptFilter, AcceptPattern};
pub use config::UploadOptions;
pub use document::{Document, NodeId};
pub use event::{
    EventDescriptor, EventInterface, EventPayload, EventType, Modifiers, MouseButton,
    MousePayload, PointerPayload,
};
pub use file::{guess_mime_type, FileDescriptor, FileList};
pub use label::{resolve, Resolution};
pub use pointer::{Point, PointerState, MOUSE_POINTER_ID};
pub use result::{GestoError, GestoResult};
pub use scenario::{ElementSpec, FileSpec, Scenario, ScenarioReport};
pub use sequencer::{Phase, Sequencer};
pub use upload::{
    click, upload, FileSelection, RejectReason, UploadOutcome, UploadStatus, UserEvent,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::mock::{MockDocument, UploadHarness};
    pub use super::{
        upload, AcceptFilter, Document, FileDescriptor, FileList, GestoError, GestoResult,
        NodeId, Point, UploadOptions, UploadOutcome, UploadStatus, UserEvent,
    };
}
