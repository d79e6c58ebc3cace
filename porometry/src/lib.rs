//! Porometry - bread crumb porosity measurement
//!
//! Measures the pore structure of a bread slice from a backlit
//! photograph: porosity fraction, hole size distribution, shape and
//! orientation anisotropy, and crumb brightness uniformity, in real
//! units given a millimeters-per-pixel calibration.
//!
//! # Example
//!
//! ```no_run
//! use porometry::analysis::{AnalysisConfig, analyze};
//!
//! let gray = porometry::io::read_grayscale("slice.png")?;
//! let output = analyze(gray, &AnalysisConfig::default())?;
//! println!("{}", porometry::analysis::format_report(&output.record));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export core types (primary data structures used everywhere)
pub use porometry_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use porometry_analysis as analysis;
pub use porometry_filter as filter;
pub use porometry_io as io;
pub use porometry_morph as morph;
pub use porometry_region as region;
