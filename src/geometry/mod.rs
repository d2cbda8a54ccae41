pub mod arc;
pub mod line_chain;
pub mod segment;

pub use arc::Arc;
pub use line_chain::{
    ChainShape, Collision, Intersection, LineChain, PointInsideTracker, ShapeRef,
};
pub use segment::Segment;
