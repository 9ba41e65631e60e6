//! Configuration section definitions.
//!
//! Each module corresponds to a table in the modal's TOML configuration:
//!
//! | Module      | TOML Section    | Purpose                                 |
//! |-------------|-----------------|-----------------------------------------|
//! | `analytics` | `[analytics]`   | Record fields pushed on close / CTA     |
//! | `animation` | `[animation]`   | Entrance and exit animation classes     |
//! | `copy`      | `[copy]`        | Title, body and button strings          |
//! | `timing`    | `[timing]`      | Injection delay and continuation delays |

mod analytics;
mod animation;
mod copy;
mod timing;

pub use analytics::AnalyticsConfig;
pub use animation::AnimationConfig;
pub use copy::CopyConfig;
pub use timing::TimingConfig;
