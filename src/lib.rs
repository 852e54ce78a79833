//! 2D polygon Boolean operations (union, intersection, difference) over an
//! arena-based edge/face model, following the seven-stage pipeline of
//! `spec.md` §2: Collect, Sort, Split, Deduplicate, Classify, Excise,
//! Restitch.

pub mod boolean;
pub mod dcel;
pub mod error;
pub mod geom;
pub mod pipeline;
pub mod tolerance;

pub use boolean::{calculate_intersections, inner_clip, intersect, outer_clip, subtract, unify, BooleanOp};
pub use dcel::{Edge, EdgeId, Face, FaceId, Polygon};
pub use error::PolygonError;
pub use geom::{Aabb, Point, Shape};
pub use tolerance::{BoundaryValue, Overlap, Tolerance};
