mod chain_intersect;
mod self_intersect;

pub use chain_intersect::{ChainIntersect, ChainIntersectResult};
pub use self_intersect::SelfIntersect;
