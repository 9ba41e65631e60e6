//! Page scroll locking.
//!
//! Locking pins `<body>` with `position: fixed`, offset by the negative of
//! the current scroll so nothing moves visually. Unlocking clears the
//! overrides and scrolls back to the captured offset.

use crate::debug;
use crate::dom::{Document, DomError};
use serde::Serialize;

/// Window scroll offsets in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollState {
    pub top: f64,
    pub left: f64,
}

impl ScrollState {
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// Inline properties written on lock and cleared on unlock.
const PINNED_PROPERTIES: [&str; 5] = ["position", "top", "left", "width", "overflow"];

/// Owns the captured [`ScrollState`] for one page session.
#[derive(Debug, Default)]
pub struct ScrollLock {
    state: ScrollState,
    locked: bool,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offsets captured by the last effective `lock`.
    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Capture the scroll offset and pin the body.
    ///
    /// Locking an already locked page keeps the first capture: the body is
    /// pinned, so the offset read now would be zero. If any property is
    /// refused, the ones already written are cleared and the scroll is
    /// restored before the error is returned.
    pub fn lock<M, D: Document<M>>(&mut self, doc: &mut D) -> Result<(), DomError> {
        if self.locked {
            debug!("scroll"; "already locked at {:?}, keeping capture", self.state);
            return Ok(());
        }
        let body = doc.body().ok_or(DomError::MissingContainer("body"))?;

        self.state = doc.scroll_offset();
        let top = format!("-{}px", self.state.top);
        let left = format!("-{}px", self.state.left);
        let pinned = [
            ("position", "fixed"),
            ("overflow", "initial"),
            ("top", top.as_str()),
            ("left", left.as_str()),
            ("width", "100%"),
        ];

        for (i, &(property, value)) in pinned.iter().enumerate() {
            if let Err(e) = doc.set_style(&body, property, value) {
                for &(written, _) in &pinned[..i] {
                    if let Err(e) = doc.remove_style(&body, written) {
                        debug!("scroll"; "rollback of `{}`: {}", written, e);
                    }
                }
                doc.scroll_to(self.state);
                return Err(e);
            }
        }
        self.locked = true;
        Ok(())
    }

    /// Clear the pinning overrides and scroll back to the captured offset.
    ///
    /// A missing body is tolerated: the scroll is still restored.
    pub fn unlock<M, D: Document<M>>(&mut self, doc: &mut D) -> Result<(), DomError> {
        if !self.locked {
            debug!("scroll"; "unlock without lock, nothing to restore");
            return Ok(());
        }
        self.locked = false;

        let cleared = match doc.body() {
            Some(body) => PINNED_PROPERTIES
                .iter()
                .try_for_each(|property| doc.remove_style(&body, property)),
            None => Err(DomError::MissingContainer("body")),
        };
        doc.scroll_to(self.state);
        cleared
    }
}
