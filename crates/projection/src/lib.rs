//! Map projections used by the pipeline.

pub mod albers;

pub use albers::AlbersEqualArea;
