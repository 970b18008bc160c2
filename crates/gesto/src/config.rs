//! Interaction options.

use crate::event::Modifiers;
use crate::pointer::Point;
use serde::{Deserialize, Serialize};

/// Options accepted by [`upload`](crate::upload::upload) and [`click`](crate::upload::click)
///
/// None of them change which events fire or in what order; they only tune
/// the payloads.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadOptions {
    /// Pointer coordinates reported in mouse and pointer events
    pub coordinates: Option<Point>,
    /// Modifier keys held during the interaction
    pub modifiers: Modifiers,
}

impl UploadOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `point` as the pointer position
    #[must_use]
    pub const fn with_coordinates(mut self, point: Point) -> Self {
        self.coordinates = Some(point);
        self
    }

    /// Hold `modifiers` during the interaction
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Starting pointer position
    #[must_use]
    pub fn start_position(&self) -> Point {
        self.coordinates.unwrap_or_default()
    }
}
