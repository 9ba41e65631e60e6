//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Placeholder substitution for style fragments
//! - `css` - Default stylesheet fragments (base, animations, mobile)
//!
//! # Usage
//!
//! ```ignore
//! use embed::{StyleVars, TemplateVars, css};
//!
//! let styles = css::default_fragments();
//! let rendered = StyleVars::from_config(&config).apply(&styles[1]);
//! ```

mod template;

pub use template::{StyleVars, TemplateVars};

pub mod css {
    /// Layout and colors of the overlay, container and controls.
    pub const BASE_CSS: &str = include_str!("css/base.css");

    /// Entrance / exit keyframes. Uses `__MODAL_ID__` and animation class placeholders.
    pub const ANIMATIONS_CSS: &str = include_str!("css/animations.css");

    /// Small-screen overrides.
    pub const MOBILE_CSS: &str = include_str!("css/mobile.css");

    /// Default fragment list, in injection order.
    pub fn default_fragments() -> Vec<String> {
        [BASE_CSS, ANIMATIONS_CSS, MOBILE_CSS]
            .into_iter()
            .map(String::from)
            .collect()
    }
}
