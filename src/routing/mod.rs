//! Connector routing refinements: crossing detection, hop-over bridges and the
//! stateful optimizer that ties them together.

pub mod bridge;
pub mod intersection;
pub mod optimizer;
mod types;

pub use bridge::{
    PathData, assemble_path, create_bridge, decide_lifted_segment, fmt_num, generate_bridge_path,
};
pub use intersection::{
    Screening, detect_intersections, find_intersection, is_near_node, screen_intersection,
};
pub use optimizer::PathOptimizer;
pub use types::{
    ArrowPath, Bridge, Intersection, IntersectionKind, PathMetrics, RejectReason, SegmentRef,
    UnresolvedCrossing,
};
