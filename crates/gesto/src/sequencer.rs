//! Event sequencer: the pointer/focus/click state machine.
//!
//! One [`Sequencer`] drives one interaction. For a click it emits, in this
//! fixed order:
//!
//! ```text
//! pointerover → pointerenter* → mouseover → mouseenter*
//!   → pointermove → mousemove
//!   → pointerdown → mousedown → [blur → focusout] → [focus → focusin]
//!   → pointerup → mouseup → click [→ click on the labelled control]
//! ```
//!
//! followed, when the caller commits a state change, by the focus re-target
//! `[blur → focusout] → [focus → focusin]`.
//!
//! The pointer starts at rest over [`Document::hover_origin`]. Enter events
//! fire once per newly entered element, from the outermost one below the
//! shared ancestor down to the target. Moving focus always blurs the element
//! that held it.
//!
//! Phases only move forward through the table in [`Phase::can_advance_to`];
//! anything else is a [`GestoError::InvalidTransition`].

use crate::config::UploadOptions;
use crate::document::{Document, NodeId};
use crate::event::{EventDescriptor, EventType, MouseButton};
use crate::label::Resolution;
use crate::pointer::PointerState;
use crate::result::{GestoError, GestoResult};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Sequencer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing emitted yet
    Idle,
    /// Pointer entered the target
    Hover,
    /// Pointer moved within the target
    Moved,
    /// Button pressed
    Pressed,
    /// Target took focus during the press
    Focused,
    /// Button released
    Released,
    /// Click dispatched
    Clicked,
    /// Original target lost focus to the file dialog
    Blurred,
    /// Effective target regained focus after the dialog closed
    RefocusedForInput,
    /// Interaction over
    Terminal,
}

impl Phase {
    /// Whether `next` directly follows `self`
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Hover)
                | (Self::Hover, Self::Moved)
                | (Self::Moved, Self::Pressed)
                | (Self::Pressed, Self::Focused | Self::Released)
                | (Self::Focused, Self::Released)
                | (Self::Released, Self::Clicked | Self::Terminal)
                | (
                    Self::Clicked,
                    Self::Blurred | Self::RefocusedForInput | Self::Terminal
                )
                | (Self::Blurred, Self::RefocusedForInput)
                | (Self::RefocusedForInput, Self::Terminal)
        )
    }
}

/// Emits interaction events against a [`Document`]
#[derive(Debug)]
pub struct Sequencer<'d, D: Document + ?Sized> {
    doc: &'d mut D,
    pointer: PointerState,
    phase: Phase,
    emitted: usize,
}

impl<'d, D: Document + ?Sized> Sequencer<'d, D> {
    /// Start an interaction on `doc`
    pub fn new(doc: &'d mut D, options: &UploadOptions) -> Self {
        let mut pointer = PointerState::new(options.start_position(), options.modifiers);
        if let Some(origin) = doc.hover_origin() {
            pointer.rest_on(ancestry(&*doc, origin));
        }
        Self {
            doc,
            pointer,
            phase: Phase::Idle,
            emitted: 0,
        }
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Pointer state of this interaction
    #[must_use]
    pub const fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Number of events dispatched so far
    #[must_use]
    pub const fn emitted(&self) -> usize {
        self.emitted
    }

    /// Read access to the document mid-sequence
    #[must_use]
    pub fn document(&self) -> &D {
        &*self.doc
    }

    /// Hover, press, release and click the interaction target.
    ///
    /// When `resolution` delegates from a label, the click is followed by a
    /// click on the labelled control, unless that control is disabled.
    pub fn click(&mut self, resolution: Resolution) -> GestoResult<()> {
        let target = resolution.interaction;
        self.ensure_connected(target)?;

        self.advance(Phase::Hover)?;
        let entered = self.pointer.hover(ancestry(&*self.doc, target));
        self.emit_pointer(EventType::PointerOver, target)?;
        for &node in &entered {
            self.emit_pointer(EventType::PointerEnter, node)?;
        }
        self.emit_mouse(EventType::MouseOver, target, 0)?;
        for &node in &entered {
            self.emit_mouse(EventType::MouseEnter, node, 0)?;
        }

        self.advance(Phase::Moved)?;
        self.emit_pointer(EventType::PointerMove, target)?;
        self.emit_mouse(EventType::MouseMove, target, 0)?;

        self.advance(Phase::Pressed)?;
        self.pointer.press(target, MouseButton::Left);
        self.emit_pointer(EventType::PointerDown, target)?;
        self.emit_mouse(EventType::MouseDown, target, 1)?;

        if self.needs_focus(target) {
            self.advance(Phase::Focused)?;
            let previous = self.doc.active_element();
            self.focus(target, previous)?;
        }

        self.advance(Phase::Released)?;
        let completes_click = self.pointer.release(target, MouseButton::Left);
        self.emit_pointer(EventType::PointerUp, target)?;
        self.emit_mouse(EventType::MouseUp, target, 1)?;

        if !completes_click {
            return Ok(());
        }
        self.advance(Phase::Clicked)?;
        self.emit_mouse(EventType::Click, target, 1)?;

        if resolution.is_delegated() {
            let control = resolution.effective;
            if self.doc.is_disabled(control) {
                trace!(control = %control, "labelled control is disabled, click not forwarded");
            } else {
                self.emit_mouse(EventType::Click, control, 1)?;
            }
        }
        Ok(())
    }

    /// Move focus from `from` to `to` after the file dialog closes.
    ///
    /// `blur`/`focusout` fire on `from` only if it is the active element;
    /// `focus`/`focusin` fire on `to` only if it is focusable and not
    /// already active, after blurring whatever else still holds focus.
    pub fn refocus(&mut self, from: NodeId, to: NodeId) -> GestoResult<()> {
        if self.doc.active_element() == Some(from) {
            self.advance(Phase::Blurred)?;
            self.doc.set_active_element(None);
            self.emit(EventDescriptor::focus(EventType::Blur, from, Some(to)))?;
            self.emit(EventDescriptor::focus(EventType::FocusOut, from, Some(to)))?;
        }

        self.advance(Phase::RefocusedForInput)?;
        if self.needs_focus(to) {
            self.focus(to, Some(from))?;
        }
        Ok(())
    }

    /// End the interaction and hand the document back
    pub fn finish(mut self) -> GestoResult<&'d mut D> {
        self.advance(Phase::Terminal)?;
        trace!(emitted = self.emitted, "interaction finished");
        Ok(self.doc)
    }

    fn needs_focus(&self, node: NodeId) -> bool {
        self.doc.is_focusable(node) && self.doc.active_element() != Some(node)
    }

    fn focus(&mut self, node: NodeId, related: Option<NodeId>) -> GestoResult<()> {
        if let Some(previous) = self.doc.active_element().filter(|p| *p != node) {
            self.doc.set_active_element(None);
            self.emit(EventDescriptor::focus(EventType::Blur, previous, Some(node)))?;
            self.emit(EventDescriptor::focus(EventType::FocusOut, previous, Some(node)))?;
        }
        self.doc.set_active_element(Some(node));
        self.emit(EventDescriptor::focus(EventType::Focus, node, related))?;
        self.emit(EventDescriptor::focus(EventType::FocusIn, node, related))
    }

    fn ensure_connected(&self, node: NodeId) -> GestoResult<()> {
        if self.doc.is_connected(node) {
            Ok(())
        } else {
            Err(GestoError::DetachedTarget { node })
        }
    }

    fn advance(&mut self, next: Phase) -> GestoResult<()> {
        if !self.phase.can_advance_to(next) {
            return Err(GestoError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }

    fn emit_pointer(&mut self, event_type: EventType, target: NodeId) -> GestoResult<()> {
        let payload = self.pointer.pointer_payload(MouseButton::Left);
        self.emit(EventDescriptor::pointer(event_type, target, payload))
    }

    fn emit_mouse(&mut self, event_type: EventType, target: NodeId, detail: u32) -> GestoResult<()> {
        let payload = self.pointer.mouse_payload(MouseButton::Left, detail);
        self.emit(EventDescriptor::mouse(event_type, target, payload))
    }

    fn emit(&mut self, event: EventDescriptor) -> GestoResult<()> {
        trace!(event = event.name(), target = %event.target, "dispatch");
        self.doc.dispatch_event(&event)?;
        self.emitted += 1;
        Ok(())
    }
}

/// `node` and its ancestors, outermost first
fn ancestry<D: Document + ?Sized>(doc: &D, node: NodeId) -> Vec<NodeId> {
    let mut path = vec![node];
    let mut current = doc.parent_element(node);
    while let Some(parent) = current {
        path.push(parent);
        current = doc.parent_element(parent);
    }
    path.reverse();
    path
}
