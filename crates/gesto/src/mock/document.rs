//! In-memory [`Document`] with listeners, bubbling and an event log.

use crate::document::{Document, NodeId};
use crate::event::{EventDescriptor, EventType};
use crate::file::FileList;
use crate::result::{GestoError, GestoResult};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Listener callback: receives the event and the node currently handling it.
///
/// Returning `Err` aborts the dispatch with [`GestoError::Listener`].
pub type ListenerFn = Box<dyn FnMut(&EventDescriptor, NodeId) -> Result<(), String>>;

struct Listener {
    node: NodeId,
    event_type: EventType,
    callback: ListenerFn,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("node", &self.node)
            .field("event_type", &self.event_type)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    files: FileList,
}

/// One dispatched event as recorded by [`MockDocument`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event type
    pub event_type: EventType,
    /// Dispatch target
    pub target: NodeId,
    /// Selector-like description of the target, e.g. `input#files`
    pub label: String,
    /// Full descriptor as dispatched
    pub event: EventDescriptor,
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.label, self.event_type)?;
        if let crate::event::EventPayload::Mouse(mouse) = &self.event.payload {
            write!(f, ": {}", mouse.button)?;
        }
        Ok(())
    }
}

/// Tags that a `<label>` can be associated with
const LABELABLE: [&str; 7] = [
    "button", "input", "meter", "output", "progress", "select", "textarea",
];

/// Tags that take focus without a `tabindex`
const FOCUSABLE: [&str; 4] = ["button", "input", "select", "textarea"];

/// Tags that honour the `disabled` attribute
const DISABLEABLE: [&str; 6] = ["button", "fieldset", "input", "optgroup", "select", "textarea"];

/// A small element tree standing in for a browser document
///
/// Node `#0` is the document root (`html`), `#1` its `body`.
#[derive(Debug)]
pub struct MockDocument {
    nodes: Vec<Element>,
    listeners: Vec<Listener>,
    active: Option<NodeId>,
    log: Vec<EventRecord>,
}

impl Default for MockDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDocument {
    /// Empty document with `html` and `body`
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            listeners: Vec::new(),
            active: None,
            log: Vec::new(),
        };
        let root = doc.create_element("html");
        let body = doc.create_element("body");
        doc.append_child(root, body);
        doc
    }

    /// Document root
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// `body` element
    #[must_use]
    pub const fn body(&self) -> NodeId {
        NodeId(1)
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
            files: FileList::new(),
        });
        id
    }

    /// Move `child` under `parent`, detaching it from any previous parent.
    ///
    /// Ignored when either handle is unknown or the move would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent)
            || !self.contains(child)
            || parent == child
            || self.is_ancestor(child, parent)
        {
            return;
        }
        self.detach(child);
        if let Some(element) = self.nodes.get_mut(child.0) {
            element.parent = Some(parent);
        }
        if let Some(element) = self.nodes.get_mut(parent.0) {
            element.children.push(child);
        }
    }

    /// Create an element with `attributes` and append it to `parent`
    pub fn append(&mut self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let node = self.create_element(tag);
        for (name, value) in attributes {
            self.set_attribute(node, name, value);
        }
        self.append_child(parent, node);
        node
    }

    /// Remove `node` from its parent; its subtree stays intact
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get_mut(node.0).and_then(|e| e.parent.take()) else {
            return;
        };
        if let Some(element) = self.nodes.get_mut(parent.0) {
            element.children.retain(|c| *c != node);
        }
        if self.active.is_some_and(|a| a == node || self.is_ancestor(node, a)) {
            self.active = None;
        }
    }

    /// Set an attribute (names are case-insensitive); unknown handles are ignored
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.nodes.get_mut(node.0) {
            element
                .attributes
                .insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    /// Remove an attribute; unknown handles are ignored
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(element) = self.nodes.get_mut(node.0) {
            element.attributes.remove(&name.to_ascii_lowercase());
        }
    }

    /// Parent element
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|e| e.parent)
    }

    /// Child elements in document order
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node.0).map_or(&[][..], |e| e.children.as_slice())
    }

    /// First connected element with `id`, in document order
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|n| self.attribute(*n, "id").is_some_and(|v| v == id))
    }

    /// Register a listener for `event_type` on `node`
    pub fn add_listener<F>(&mut self, node: NodeId, event_type: EventType, callback: F)
    where
        F: FnMut(&EventDescriptor, NodeId) -> Result<(), String> + 'static,
    {
        self.listeners.push(Listener {
            node,
            event_type,
            callback: Box::new(callback),
        });
    }

    /// Count how often `node` observes `event_type`, including bubbled events
    pub fn count_events(&mut self, node: NodeId, event_type: EventType) -> Rc<Cell<usize>> {
        let counter = Rc::new(Cell::new(0));
        let handle = Rc::clone(&counter);
        self.add_listener(node, event_type, move |_, _| {
            handle.set(handle.get() + 1);
            Ok(())
        });
        counter
    }

    /// Every dispatched event, in order
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        &self.log
    }

    /// Event names, in order
    #[must_use]
    pub fn event_names(&self) -> Vec<&'static str> {
        self.log.iter().map(|r| r.event_type.name()).collect()
    }

    /// Events dispatched directly at `node`
    #[must_use]
    pub fn events_on(&self, node: NodeId) -> Vec<&EventRecord> {
        self.log.iter().filter(|r| r.target == node).collect()
    }

    /// Forget recorded events
    pub fn clear_events(&mut self) {
        self.log.clear();
    }

    /// One line per event: `label[for="files"] - click: Left (0)`
    #[must_use]
    pub fn snapshot(&self) -> String {
        self.log
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Selector-like description: tag, `#id`, then `for`/`name`/`type` attributes
    #[must_use]
    pub fn describe(&self, node: NodeId) -> String {
        let Some(element) = self.nodes.get(node.0) else {
            return format!("{node}");
        };
        let mut out = element.tag.clone();
        if let Some(id) = element.attributes.get("id") {
            out.push('#');
            out.push_str(id);
        }
        for name in ["for", "name", "type"] {
            if let Some(value) = element.attributes.get(name) {
                out.push_str(&format!("[{name}=\"{value}\"]"));
            }
        }
        out
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    fn is_labelable(&self, node: NodeId) -> bool {
        let Some(element) = self.nodes.get(node.0) else {
            return false;
        };
        LABELABLE.contains(&element.tag.as_str())
            && !(element.tag == "input"
                && element.attributes.get("type").is_some_and(|t| t.eq_ignore_ascii_case("hidden")))
    }

    fn propagation_path(&self, event: &EventDescriptor) -> Vec<NodeId> {
        let mut path = vec![event.target];
        if event.bubbles {
            let mut current = self.parent(event.target);
            while let Some(p) = current {
                path.push(p);
                current = self.parent(p);
            }
        }
        path
    }
}

impl Document for MockDocument {
    fn is_connected(&self, node: NodeId) -> bool {
        node == self.root() || (self.contains(node) && self.is_ancestor(self.root(), node))
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.nodes.get(node.0).map(|e| e.tag.clone())
    }

    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes
            .get(node.0)?
            .attributes
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    fn associated_control(&self, label: NodeId) -> Option<NodeId> {
        if !self.is_label(label) {
            return None;
        }
        match self.attribute(label, "for") {
            Some(id) => self.element_by_id(&id).filter(|n| self.is_labelable(*n)),
            None => self
                .descendants(label)
                .into_iter()
                .find(|n| self.is_labelable(*n)),
        }
    }

    fn is_focusable(&self, node: NodeId) -> bool {
        let Some(element) = self.nodes.get(node.0) else {
            return false;
        };
        if !self.is_connected(node) {
            return false;
        }
        if DISABLEABLE.contains(&element.tag.as_str()) && element.attributes.contains_key("disabled")
        {
            return false;
        }
        if element.tag == "input"
            && element.attributes.get("type").is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
        {
            return false;
        }
        FOCUSABLE.contains(&element.tag.as_str())
            || (element.tag == "a" && element.attributes.contains_key("href"))
            || element.attributes.contains_key("tabindex")
    }

    fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    fn hover_origin(&self) -> Option<NodeId> {
        Some(self.body())
    }

    fn set_active_element(&mut self, node: Option<NodeId>) {
        self.active = node;
    }

    fn files(&self, node: NodeId) -> FileList {
        self.nodes
            .get(node.0)
            .map(|e| e.files.clone())
            .unwrap_or_default()
    }

    fn set_files(&mut self, node: NodeId, files: FileList) -> GestoResult<()> {
        let element = self
            .nodes
            .get_mut(node.0)
            .ok_or(GestoError::UnknownNode { node })?;
        element.files = files;
        Ok(())
    }

    fn dispatch_event(&mut self, event: &EventDescriptor) -> GestoResult<()> {
        if !self.contains(event.target) {
            return Err(GestoError::UnknownNode { node: event.target });
        }
        self.log.push(EventRecord {
            event_type: event.event_type,
            target: event.target,
            label: self.describe(event.target),
            event: event.clone(),
        });

        for current in self.propagation_path(event) {
            for listener in self
                .listeners
                .iter_mut()
                .filter(|l| l.node == current && l.event_type == event.event_type)
            {
                (listener.callback)(event, current)
                    .map_err(|message| GestoError::listener(event.name(), message))?;
            }
        }
        Ok(())
    }
}
