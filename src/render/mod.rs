pub mod interpolator;
pub mod renderer;

pub use interpolator::{
    Checkerboard, Frame, FrameInterpolator, HeadSprite, Joint, Point, Shade, TailCap,
};
pub use renderer::{Hud, Overlay, Renderer};
