//! Binary mathematical morphology on change masks
//!
//! - **Erosion**: shrinks flagged regions
//! - **Dilation**: expands flagged regions
//! - **Opening**: erosion then dilation (removes speckle)

mod dilate;
mod element;
mod erode;
mod filter;
mod opening;

pub use dilate::dilate;
pub use element::StructuringElement;
pub use erode::erode;
pub use opening::{coherence_ratio, opening};
