//! Gesture simulation for the terminal host
//!
//! Keyboard input is turned into overlay offsets the way a touch screen
//! would produce them: eased scroll steps, a rubber-banded pull past the top
//! edge and a bounce back to rest.
//!
//! - `easing` - easing curves
//! - `timing` - progress, interpolation and rubber-band resistance
//! - `config` - duration helpers on top of [`ScrollConfig`]
//! - `animation` - the [`OffsetAnimator`] combining them
//!
//! ```ignore
//! use pagescroll_tui::scroll::OffsetAnimator;
//!
//! let mut animator = OffsetAnimator::new(config.scroll.clone());
//! animator.scroll_by(10.0, max_offset);
//!
//! // Every frame
//! let y = animator.update(max_offset);
//! coordinator.on_user_scroll(y);
//! ```

pub mod config;
pub mod easing;
pub mod timing;

pub mod animation;

pub use animation::{GesturePhase, OffsetAnimator};
pub use config::{ScrollConfig, ScrollConfigExt};
pub use easing::{EasingType, EasingTypeExt};
