//! Map surface contract and marker vocabulary

mod headless;
pub mod icons;
mod surface;

pub use headless::{HeadlessSurface, OpenPopup};
pub use surface::{MapSurface, MarkerAnimation, MarkerIcon, MarkerId, MarkerSpec};
