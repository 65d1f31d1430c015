//! In-memory frames and the pure image transforms applied to them.

/// Decoded raster frames.
pub mod frame;
/// Animated GIF assembly.
pub mod gif;
/// Bounded, aspect-preserving downscale.
pub mod resize;
/// Vertical stitching.
pub mod stitch;
