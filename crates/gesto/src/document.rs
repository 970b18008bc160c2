//! Document collaborator consumed by the engine.
//!
//! The engine never walks a DOM itself. Everything it needs from the
//! surrounding document (attributes, label association, focus state, file
//! collections and event dispatch) goes through [`Document`], so tests can
//! plug in [`MockDocument`](crate::mock::MockDocument) and real hosts can plug
//! in their own tree.

use crate::event::EventDescriptor;
use crate::file::FileList;
use crate::result::GestoResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to an element owned by a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The surrounding document, as seen by the interaction engine
pub trait Document {
    /// Whether `node` is attached to this document
    fn is_connected(&self, node: NodeId) -> bool;

    /// Lower-case tag name, `None` for unknown handles
    fn tag_name(&self, node: NodeId) -> Option<String>;

    /// Parent element, `None` for the root and detached elements
    fn parent_element(&self, node: NodeId) -> Option<NodeId>;

    /// Attribute value, `None` when absent
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Control labelled by `label` through `for` or containment
    ///
    /// Returns `None` when `label` is not a label, its `for` names no
    /// element, or it contains no labelable control.
    fn associated_control(&self, label: NodeId) -> Option<NodeId>;

    /// Whether `node` can receive focus
    fn is_focusable(&self, node: NodeId) -> bool;

    /// Currently focused element
    fn active_element(&self) -> Option<NodeId>;

    /// Move focus; `None` returns focus to the document body
    fn set_active_element(&mut self, node: Option<NodeId>);

    /// Current file collection of `node`
    fn files(&self, node: NodeId) -> FileList;

    /// Replace the file collection of `node`
    fn set_files(&mut self, node: NodeId, files: FileList) -> GestoResult<()>;

    /// Dispatch `event` synchronously, running every listener before returning.
    ///
    /// A failing listener surfaces as `Err` and the engine stops emitting.
    fn dispatch_event(&mut self, event: &EventDescriptor) -> GestoResult<()>;

    /// Element the pointer rests over before an interaction starts
    ///
    /// Enter events never fire on it or its ancestors. `None` means the
    /// pointer starts outside the document.
    fn hover_origin(&self) -> Option<NodeId> {
        None
    }

    /// Whether the attribute is present at all
    fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// `disabled` attribute present
    fn is_disabled(&self, node: NodeId) -> bool {
        self.has_attribute(node, "disabled")
    }

    /// `<input type="file">`
    fn is_file_input(&self, node: NodeId) -> bool {
        self.tag_name(node).as_deref() == Some("input")
            && self
                .attribute(node, "type")
                .is_some_and(|ty| ty.eq_ignore_ascii_case("file"))
    }

    /// `multiple` attribute present
    fn accepts_multiple(&self, node: NodeId) -> bool {
        self.has_attribute(node, "multiple")
    }

    /// `<label>`
    fn is_label(&self, node: NodeId) -> bool {
        self.tag_name(node).as_deref() == Some("label")
    }
}
