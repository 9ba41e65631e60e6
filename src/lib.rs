//! lcs-modal - a promotional modal injected into a single landing page.
//!
//! After a delay the modal is shown, page scroll is locked, and the close
//! and call-to-action controls report to the page's analytics data layer
//! before the modal animates out and is detached.
//!
//! # Module Structure
//!
//! ```text
//! src/
//! ├── config/      # ModalConfig, sections, diagnostics, process-wide handle
//! ├── dom/         # Document trait, element builder, in-memory document
//! ├── embed/       # Embedded stylesheets and their placeholders
//! ├── lifecycle/   # State machine and deferred tasks
//! ├── gate.rs      # Injection preconditions
//! ├── style.rs     # Style block injection and fallback
//! ├── scroll.rs    # Scroll lock
//! ├── modal.rs     # Modal tree assembly
//! ├── analytics.rs # Data-layer records
//! ├── logger.rs    # Prefixed, capturable logging
//! └── web.rs       # Browser host (wasm32 only)
//! ```
//!
//! The core never touches a browser directly: everything goes through
//! [`dom::Document`], so the same controller runs against
//! [`dom::MemoryDocument`] in tests and against the live page on wasm.

pub mod logger;

pub mod analytics;
pub mod config;
pub mod dom;
pub mod embed;
pub mod gate;
pub mod lifecycle;
pub mod modal;
pub mod scroll;
pub mod style;

mod utils;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ModalConfig, cfg, init_config};
pub use dom::{Document, MemoryDocument};
pub use lifecycle::{LifecycleController, ModalIntent, Phase};
