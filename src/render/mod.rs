mod color;
mod error;
mod layout;
mod scroll;
mod text;
mod virtual_display;

pub use color::Color;
pub use error::DisplayError;
pub use layout::{layout, LayoutSpec};
pub use scroll::{ScrollProfile, ScrollRenderer};
pub use text::{TextRenderer, ViewportSpec};
pub use virtual_display::{DrawOp, Frame, VirtualDisplay};
