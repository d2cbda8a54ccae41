pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod tessellation;

pub use error::{ChainError, Result};
pub use geometry::{Arc, LineChain, Segment, ShapeRef};
pub use math::{Coord, Point};
pub use tessellation::TessellationParams;
