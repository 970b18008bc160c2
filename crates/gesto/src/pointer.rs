//! Pointer state carried through one interaction.

use crate::document::NodeId;
use crate::event::{Modifiers, MouseButton, MousePayload, PointerPayload};
use serde::{Deserialize, Serialize};

/// Viewport coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pointer position and button state for a single interaction
///
/// Owned by one sequencer run and dropped with it, so mousedown/mouseup
/// pairs and coordinates stay consistent within the run only.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerState {
    position: Point,
    modifiers: Modifiers,
    hover_path: Vec<NodeId>,
    pressed_on: Option<NodeId>,
    buttons: u16,
}

/// Pointer id reported for the simulated mouse
pub const MOUSE_POINTER_ID: u32 = 1;

impl PointerState {
    /// Pointer resting at `position` over nothing
    #[must_use]
    pub const fn new(position: Point, modifiers: Modifiers) -> Self {
        Self {
            position,
            modifiers,
            hover_path: Vec::new(),
            pressed_on: None,
            buttons: 0,
        }
    }

    /// Current position
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Element under the pointer
    #[must_use]
    pub fn hovered(&self) -> Option<NodeId> {
        self.hover_path.last().copied()
    }

    /// Element the current press started on
    #[must_use]
    pub const fn pressed_on(&self) -> Option<NodeId> {
        self.pressed_on
    }

    /// Pressed buttons bitmask
    #[must_use]
    pub const fn buttons(&self) -> u16 {
        self.buttons
    }

    /// Place the pointer over the last element of `path` without entering it
    ///
    /// `path` runs from the outermost ancestor down to the element.
    pub fn rest_on(&mut self, path: Vec<NodeId>) {
        self.hover_path = path;
    }

    /// Pointer moves over the last element of `path`.
    ///
    /// Returns the elements it newly entered, outermost first: everything
    /// below the deepest ancestor shared with the previous hover path.
    pub fn hover(&mut self, path: Vec<NodeId>) -> Vec<NodeId> {
        let shared = self
            .hover_path
            .iter()
            .zip(&path)
            .take_while(|(before, after)| before == after)
            .count();
        let entered = path[shared..].to_vec();
        self.hover_path = path;
        entered
    }

    /// Press `button` on `node`
    pub fn press(&mut self, node: NodeId, button: MouseButton) {
        self.pressed_on = Some(node);
        self.buttons |= button.mask();
    }

    /// Release `button` over `node`; returns whether it completes a click
    pub fn release(&mut self, node: NodeId, button: MouseButton) -> bool {
        self.buttons &= !button.mask();
        self.pressed_on.take() == Some(node)
    }

    /// Mouse fields for an event about `button` with click count `detail`
    #[must_use]
    pub const fn mouse_payload(&self, button: MouseButton, detail: u32) -> MousePayload {
        MousePayload {
            button,
            buttons: self.buttons,
            client: self.position,
            detail,
            modifiers: self.modifiers,
        }
    }

    /// Pointer fields for an event about `button`
    #[must_use]
    pub fn pointer_payload(&self, button: MouseButton) -> PointerPayload {
        PointerPayload {
            mouse: self.mouse_payload(button, 0),
            pointer_id: MOUSE_POINTER_ID,
            pointer_type: "mouse".to_string(),
            is_primary: true,
        }
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new(Point::default(), Modifiers::default())
    }
}
