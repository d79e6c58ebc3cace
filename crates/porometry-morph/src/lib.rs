//! Binary and grayscale mathematical morphology
//!
//! Structuring elements, binary erosion/dilation/opening/closing over
//! [`porometry_core::Mask`], and grayscale min/max morphology over
//! [`porometry_core::Gray8`] for illumination background estimation.

pub mod binary;
pub mod error;
pub mod grayscale;
pub mod sel;

pub use binary::{close, dilate, erode, open};
pub use error::{MorphError, MorphResult};
pub use grayscale::{dilate_gray, erode_gray, open_gray};
pub use sel::Sel;
