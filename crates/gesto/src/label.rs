//! Label resolution: which element an interaction ultimately acts on.

use crate::document::{Document, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of resolving an interaction target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Element the pointer acts on (the label, if one was clicked)
    pub interaction: NodeId,
    /// Element receiving focus, files and mutation events
    pub effective: NodeId,
}

impl Resolution {
    /// Resolution that acts on `node` itself
    #[must_use]
    pub const fn identity(node: NodeId) -> Self {
        Self {
            interaction: node,
            effective: node,
        }
    }

    /// Whether a label delegated to another control
    #[must_use]
    pub fn is_delegated(&self) -> bool {
        self.interaction != self.effective
    }
}

/// Resolve `target` to its effective control.
///
/// A label with a connected associated control delegates to it; anything
/// else, including a label whose `for` names a missing id, resolves to
/// itself.
pub fn resolve<D: Document + ?Sized>(doc: &D, target: NodeId) -> Resolution {
    if !doc.is_label(target) {
        return Resolution::identity(target);
    }

    match doc.associated_control(target) {
        Some(control) if control != target && doc.is_connected(control) => {
            debug!(label = %target, control = %control, "label delegates to control");
            Resolution {
                interaction: target,
                effective: control,
            }
        }
        _ => {
            debug!(
                label = %target,
                for_attr = ?doc.attribute(target, "for"),
                "label has no associated control"
            );
            Resolution::identity(target)
        }
    }
}
