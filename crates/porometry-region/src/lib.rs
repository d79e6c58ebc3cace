//! Region analysis: connected components, hole filling, boundaries, and
//! shape fitting
//!
//! Everything that treats a [`porometry_core::Mask`] as a set of
//! discrete regions rather than raw pixels lives here.

pub mod boundary;
pub mod ellipse;
pub mod error;
pub mod fill;
pub mod label;

pub use boundary::boundary_points;
pub use ellipse::{EllipseFit, fit_ellipse};
pub use error::{RegionError, RegionResult};
pub use fill::fill_holes;
pub use label::{Connectivity, LabelMap, filter_by_area, label_components};
