//! Upload test harness
//!
//! Wraps a [`MockDocument`] with the common fixtures (a lone file input, an
//! input inside a form, a label pointing at an input) and assertion helpers
//! over the recorded event log.

use super::document::MockDocument;
use crate::config::UploadOptions;
use crate::document::{Document, NodeId};
use crate::event::EventType;
use crate::upload::{upload, FileSelection, UploadOutcome};

/// Assertion over the recorded event log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventAssertion {
    /// Names equal exactly, in order
    Sequence(Vec<EventType>),
    /// Event type occurs at least once
    Contains(EventType),
    /// Event type never occurs
    Absent(EventType),
    /// Event type dispatched at `node` exactly `count` times
    CountOn {
        /// Dispatch target
        node: NodeId,
        /// Event type
        event_type: EventType,
        /// Expected count
        count: usize,
    },
}

impl EventAssertion {
    /// Check the assertion against `doc`'s log
    #[must_use]
    pub fn check(&self, doc: &MockDocument) -> bool {
        let types = || doc.events().iter().map(|r| r.event_type);
        match self {
            Self::Sequence(expected) => types().eq(expected.iter().copied()),
            Self::Contains(ty) => types().any(|t| t == *ty),
            Self::Absent(ty) => types().all(|t| t != *ty),
            Self::CountOn {
                node,
                event_type,
                count,
            } => {
                doc.events_on(*node)
                    .iter()
                    .filter(|r| r.event_type == *event_type)
                    .count()
                    == *count
            }
        }
    }

    /// Human-readable description
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Sequence(expected) => {
                let names: Vec<_> = expected.iter().map(|t| t.name()).collect();
                format!("events == [{}]", names.join(", "))
            }
            Self::Contains(ty) => format!("events contain {ty}"),
            Self::Absent(ty) => format!("events never contain {ty}"),
            Self::CountOn {
                node,
                event_type,
                count,
            } => format!("{event_type} on {node} fired {count} time(s)"),
        }
    }
}

/// Harness around one document and its upload target
#[derive(Debug)]
pub struct UploadHarness {
    /// Document under test
    pub doc: MockDocument,
    input: NodeId,
    target: NodeId,
    options: UploadOptions,
    uploads: usize,
}

impl UploadHarness {
    /// `<input type="file" ...attributes>` directly in `body`
    #[must_use]
    pub fn single_input(attributes: &[(&str, &str)]) -> Self {
        let mut doc = MockDocument::new();
        let body = doc.body();
        let input = doc.append(body, "input", &with_file_type(attributes));
        Self::wrap(doc, input, input)
    }

    /// `<form><input type="file" ...attributes></form>`
    #[must_use]
    pub fn input_in_form(attributes: &[(&str, &str)]) -> Self {
        let mut doc = MockDocument::new();
        let body = doc.body();
        let form = doc.append(body, "form", &[]);
        let input = doc.append(form, "input", &with_file_type(attributes));
        Self::wrap(doc, input, input)
    }

    /// `<form><label for="element">` + `<input id="element" type="file" ...></form>`,
    /// targeting the label
    #[must_use]
    pub fn labelled_input(attributes: &[(&str, &str)]) -> Self {
        let mut doc = MockDocument::new();
        let body = doc.body();
        let form = doc.append(body, "form", &[]);
        let label = doc.append(form, "label", &[("for", "element")]);
        let mut attrs = with_file_type(attributes);
        attrs.push(("id", "element"));
        let input = doc.append(form, "input", &attrs);
        Self::wrap(doc, input, label)
    }

    /// Harness over an existing document
    #[must_use]
    pub fn wrap(doc: MockDocument, input: NodeId, target: NodeId) -> Self {
        Self {
            doc,
            input,
            target,
            options: UploadOptions::default(),
            uploads: 0,
        }
    }

    /// Use `options` for every upload
    #[must_use]
    pub fn with_options(mut self, options: UploadOptions) -> Self {
        self.options = options;
        self
    }

    /// The file input
    #[must_use]
    pub const fn input(&self) -> NodeId {
        self.input
    }

    /// The element uploads are performed through (label or input)
    #[must_use]
    pub const fn target(&self) -> NodeId {
        self.target
    }

    /// Number of uploads performed
    #[must_use]
    pub const fn uploads(&self) -> usize {
        self.uploads
    }

    /// Upload through the harness target
    ///
    /// # Panics
    ///
    /// Panics if the upload fails.
    pub fn upload(&mut self, files: impl Into<FileSelection>) -> UploadOutcome {
        self.uploads += 1;
        upload(&mut self.doc, self.target, files, &self.options)
            .unwrap_or_else(|e| panic!("upload #{} failed: {e}", self.uploads))
    }

    /// Names of files held by the input
    #[must_use]
    pub fn file_names(&self) -> Vec<String> {
        self.doc
            .files(self.input)
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    }

    /// Assert the input holds exactly `names`, in order
    ///
    /// # Panics
    ///
    /// Panics on mismatch.
    pub fn assert_files(&self, names: &[&str]) {
        assert_eq!(self.file_names(), names, "file collection mismatch");
    }

    /// Assert `assertion` holds
    ///
    /// # Panics
    ///
    /// Panics if it does not.
    pub fn assert(&self, assertion: &EventAssertion) {
        assert!(
            assertion.check(&self.doc),
            "assertion failed: {}\nlog:\n{}",
            assertion.describe(),
            self.doc.snapshot()
        );
    }

    /// Assert neither `input` nor `change` was dispatched
    ///
    /// # Panics
    ///
    /// Panics if either was.
    pub fn assert_no_mutation(&self) {
        self.assert(&EventAssertion::Absent(EventType::Input));
        self.assert(&EventAssertion::Absent(EventType::Change));
    }

    /// Forget recorded events, keeping the document state
    pub fn clear_events(&mut self) {
        self.doc.clear_events();
    }
}

fn with_file_type<'a>(attributes: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    let mut all = vec![("type", "file")];
    all.extend_from_slice(attributes);
    all
}
