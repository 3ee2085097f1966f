pub mod handler;
pub mod swipe;

pub use handler::{InputHandler, KeyAction};
pub use swipe::{SWIPE_THRESHOLD, SwipeTracker};
