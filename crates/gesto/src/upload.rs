//! Upload orchestration: click, pick files, commit, notify.

use crate::accept::AcceptFilter;
use crate::config::UploadOptions;
use crate::document::{Document, NodeId};
use crate::event::{EventDescriptor, EventType};
use crate::file::{FileDescriptor, FileList};
use crate::label::{self, Resolution};
use crate::result::{GestoError, GestoResult};
use crate::sequencer::Sequencer;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Files handed to an upload, normalised to a sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection(Vec<FileDescriptor>);

impl FileSelection {
    /// Files in the order they were offered
    #[must_use]
    pub fn into_vec(self) -> Vec<FileDescriptor> {
        self.0
    }
}

impl From<FileDescriptor> for FileSelection {
    fn from(file: FileDescriptor) -> Self {
        Self(vec![file])
    }
}

impl From<Vec<FileDescriptor>> for FileSelection {
    fn from(files: Vec<FileDescriptor>) -> Self {
        Self(files)
    }
}

impl From<&[FileDescriptor]> for FileSelection {
    fn from(files: &[FileDescriptor]) -> Self {
        Self(files.to_vec())
    }
}

impl<const N: usize> From<[FileDescriptor; N]> for FileSelection {
    fn from(files: [FileDescriptor; N]) -> Self {
        Self(files.into())
    }
}

/// Why an upload left the file collection untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Target or its labelled control is disabled
    Disabled,
    /// Effective target is not `<input type="file">`
    NotFileInput,
    /// No files were offered
    NoFiles,
    /// Every offered file failed the accept constraint
    NoneAccepted,
}

/// Terminal state of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadStatus {
    /// Files were assigned and `input`/`change` fired
    Committed,
    /// Nothing changed
    Rejected(RejectReason),
}

/// What an upload did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    /// Interaction and effective targets
    pub resolution: Resolution,
    /// Committed or rejected
    pub status: UploadStatus,
    /// Files now held by the effective target (empty when rejected)
    pub accepted: FileList,
    /// Offered files that were not committed
    pub rejected: Vec<FileDescriptor>,
}

impl UploadOutcome {
    /// Whether the file collection changed
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self.status, UploadStatus::Committed)
    }
}

/// Simulate a user picking `files` through `target`.
///
/// `target` may be the file input itself or a label for it. The
/// pointer/click sequence always runs on `target`; files are filtered by the
/// effective input's `accept`, capped to one unless it is `multiple`, and
/// replace its previous selection. `input` and `change` fire only when at
/// least one file is committed.
pub fn upload<D: Document + ?Sized>(
    doc: &mut D,
    target: NodeId,
    files: impl Into<FileSelection>,
    options: &UploadOptions,
) -> GestoResult<UploadOutcome> {
    let files = files.into().into_vec();
    if !doc.is_connected(target) {
        return Err(GestoError::DetachedTarget { node: target });
    }

    let resolution = label::resolve(&*doc, target);
    let effective = resolution.effective;
    debug!(
        target = %target,
        effective = %effective,
        offered = files.len(),
        "upload started"
    );

    let mut sequencer = Sequencer::new(doc, options);
    sequencer.click(resolution)?;

    let (accepted, rejected) = match select_files(sequencer.document(), resolution, files) {
        Ok(accepted) => accepted,
        Err((reason, rejected)) => {
            sequencer.finish()?;
            debug!(target = %target, ?reason, "upload rejected");
            return Ok(UploadOutcome {
                resolution,
                status: UploadStatus::Rejected(reason),
                accepted: FileList::new(),
                rejected,
            });
        }
    };

    sequencer.refocus(target, effective)?;
    let doc = sequencer.finish()?;

    doc.set_files(effective, accepted.clone())?;
    for event_type in [EventType::Input, EventType::Change] {
        let event = EventDescriptor::plain(event_type, effective);
        trace!(event = event.name(), target = %effective, "dispatch");
        doc.dispatch_event(&event)?;
    }

    debug!(target = %target, committed = accepted.len(), "upload committed");
    Ok(UploadOutcome {
        resolution,
        status: UploadStatus::Committed,
        accepted,
        rejected,
    })
}

/// Run only the pointer/click sequence on `target`
pub fn click<D: Document + ?Sized>(
    doc: &mut D,
    target: NodeId,
    options: &UploadOptions,
) -> GestoResult<Resolution> {
    let resolution = label::resolve(&*doc, target);
    let mut sequencer = Sequencer::new(doc, options);
    sequencer.click(resolution)?;
    sequencer.finish()?;
    Ok(resolution)
}

type Selection = (FileList, Vec<FileDescriptor>);

fn select_files<D: Document + ?Sized>(
    doc: &D,
    resolution: Resolution,
    files: Vec<FileDescriptor>,
) -> Result<Selection, (RejectReason, Vec<FileDescriptor>)> {
    let effective = resolution.effective;
    if doc.is_disabled(resolution.interaction) || doc.is_disabled(effective) {
        return Err((RejectReason::Disabled, files));
    }
    if !doc.is_file_input(effective) {
        warn!(target = %effective, tag = ?doc.tag_name(effective), "upload target is not a file input");
        return Err((RejectReason::NotFileInput, files));
    }
    if files.is_empty() {
        return Err((RejectReason::NoFiles, files));
    }

    let filter = AcceptFilter::from_attribute(doc.attribute(effective, "accept").as_deref());
    let (mut accepted, mut rejected) = filter.partition(files);
    if accepted.is_empty() {
        return Err((RejectReason::NoneAccepted, rejected));
    }
    if !doc.accepts_multiple(effective) && accepted.len() > 1 {
        rejected.extend(accepted.split_off(1));
    }
    Ok((accepted.into(), rejected))
}

/// Interaction session bound to one document
///
/// Carries default [`UploadOptions`] so tests don't repeat them per call.
#[derive(Debug)]
pub struct UserEvent<'d, D: Document + ?Sized> {
    doc: &'d mut D,
    options: UploadOptions,
}

impl<'d, D: Document + ?Sized> UserEvent<'d, D> {
    /// Start a session on `doc`
    pub fn new(doc: &'d mut D) -> Self {
        Self {
            doc,
            options: UploadOptions::default(),
        }
    }

    /// Use `options` for every interaction of this session
    #[must_use]
    pub fn with_options(mut self, options: UploadOptions) -> Self {
        self.options = options;
        self
    }

    /// Upload `files` through `target`
    pub fn upload(
        &mut self,
        target: NodeId,
        files: impl Into<FileSelection>,
    ) -> GestoResult<UploadOutcome> {
        upload(&mut *self.doc, target, files, &self.options)
    }

    /// Click `target`
    pub fn click(&mut self, target: NodeId) -> GestoResult<Resolution> {
        click(&mut *self.doc, target, &self.options)
    }

    /// Read access to the document
    #[must_use]
    pub fn document(&self) -> &D {
        &*self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDocument;

    fn png(name: &str) -> FileDescriptor {
        FileDescriptor::png(name, b"hello".to_vec())
    }

    fn single_input(attrs: &[(&str, &str)]) -> (MockDocument, NodeId) {
        let mut doc = MockDocument::new();
        let body = doc.body();
        let mut all = vec![("type", "file")];
        all.extend_from_slice(attrs);
        let input = doc.append(body, "input", &all);
        (doc, input)
    }

    #[test]
    fn test_selection_normalises_single_and_many() {
        assert_eq!(FileSelection::from(png("a.png")).into_vec().len(), 1);
        assert_eq!(FileSelection::from([png("a.png"), png("b.png")]).into_vec().len(), 2);
        let files = vec![png("a.png")];
        assert_eq!(FileSelection::from(files.as_slice()).into_vec(), files);
        assert!(FileSelection::default().into_vec().is_empty());
    }

    #[test]
    fn test_upload_commits_single_file() {
        let (mut doc, input) = single_input(&[]);
        let outcome = upload(&mut doc, input, png("hello.png"), &UploadOptions::default()).unwrap();

        assert!(outcome.is_committed());
        assert_eq!(outcome.resolution, Resolution::identity(input));
        let files = doc.files(input);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0], png("hello.png"));
        assert_eq!(files.item(0), Some(&png("hello.png")));
    }

    #[test]
    fn test_upload_single_input_keeps_first_accepted() {
        let (mut doc, input) = single_input(&[]);
        let outcome = upload(
            &mut doc,
            input,
            vec![png("a.png"), png("b.png")],
            &UploadOptions::default(),
        )
        .unwrap();

        assert_eq!(doc.files(input).names(), vec!["a.png"]);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].name(), "b.png");
    }

    #[test]
    fn test_upload_disabled_reports_reason() {
        let (mut doc, input) = single_input(&[("disabled", "")]);
        let outcome = upload(&mut doc, input, png("a.png"), &UploadOptions::default()).unwrap();

        assert_eq!(outcome.status, UploadStatus::Rejected(RejectReason::Disabled));
        assert_eq!(outcome.rejected.len(), 1);
        assert!(doc.files(input).is_empty());
    }

    #[test]
    fn test_upload_none_accepted() {
        let (mut doc, input) = single_input(&[("accept", "image/jpg")]);
        let outcome = upload(&mut doc, input, png("a.png"), &UploadOptions::default()).unwrap();
        assert_eq!(outcome.status, UploadStatus::Rejected(RejectReason::NoneAccepted));
    }

    #[test]
    fn test_upload_no_files() {
        let (mut doc, input) = single_input(&[]);
        let outcome = upload(
            &mut doc,
            input,
            Vec::<FileDescriptor>::new(),
            &UploadOptions::default(),
        )
        .unwrap();
        assert_eq!(outcome.status, UploadStatus::Rejected(RejectReason::NoFiles));
        assert!(!doc.event_names().contains(&"input"));
    }

    #[test]
    fn test_upload_on_non_file_input() {
        let mut doc = MockDocument::new();
        let body = doc.body();
        let text = doc.append(body, "input", &[("type", "text")]);
        let outcome = upload(&mut doc, text, png("a.png"), &UploadOptions::default()).unwrap();
        assert_eq!(outcome.status, UploadStatus::Rejected(RejectReason::NotFileInput));
        assert!(doc.files(text).is_empty());
    }

    #[test]
    fn test_upload_detached_fails_without_events() {
        let mut doc = MockDocument::new();
        let input = doc.create_element("input");
        doc.set_attribute(input, "type", "file");

        let err = upload(&mut doc, input, png("a.png"), &UploadOptions::default()).unwrap_err();
        assert!(matches!(err, GestoError::DetachedTarget { .. }));
        assert!(doc.events().is_empty());
    }

    #[test]
    fn test_click_runs_sequence_only() {
        let (mut doc, input) = single_input(&[]);
        let resolution = click(&mut doc, input, &UploadOptions::default()).unwrap();
        assert_eq!(resolution.effective, input);
        assert_eq!(doc.event_names().len(), 13);
        assert!(doc.files(input).is_empty());
    }

    #[test]
    fn test_session_reuses_options() {
        use crate::pointer::Point;

        let (mut doc, input) = single_input(&[]);
        let mut user = UserEvent::new(&mut doc)
            .with_options(UploadOptions::new().with_coordinates(Point::new(3.0, 4.0)));
        user.upload(input, png("a.png")).unwrap();
        assert_eq!(user.document().files(input).len(), 1);

        let click = doc
            .events()
            .iter()
            .find(|e| e.event_type == EventType::Click)
            .and_then(|e| e.event.mouse_payload().copied())
            .unwrap();
        assert_eq!(click.client, Point::new(3.0, 4.0));
    }
}
