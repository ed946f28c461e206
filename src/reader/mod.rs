//! Book reader engine.
//!
//! Pure, clock-injected state used by the reader shell:
//! - [`spread`]: page count and spread index to visible pages
//! - [`preload`]: which pages to render next and when a spread is ready
//! - [`rendered`]: bounded set of finished page surfaces
//! - [`flip`]: two-phase timed page-turn state machine
//! - [`zoom`]: discrete zoom levels

pub mod flip;
pub mod preload;
pub mod rendered;
pub mod spread;
pub mod zoom;

pub use flip::{FLIP_PHASE_MS, FlipAnimator, FlipDirection, FlipPhase, FlipTick};
pub use preload::{PageKey, PreloadScheduler, pages_to_render, spread_ready};
pub use rendered::RenderedPageSet;
pub use spread::{Spread, SpreadError, compute_spread, page_label, spread_for_page, total_spreads};
pub use zoom::{DEFAULT_ZOOM_INDEX, DEFAULT_ZOOM_LEVELS, ZoomController, ZoomError};
