//! Point-in-Polygon (PIP) region lookups.
//!
//! Ray casting per ring with antimeridian handling, hole subtraction per
//! polygon, and an R-tree per named region set for candidate filtering.

mod context;
mod index;
mod region;
mod ring;

pub use context::{
    Classification, Evaluation, RegionContext, RegionContextBuilder, DRIVE_LEFT, IMPERIAL,
};
pub use index::{RegionIndex, RegionStats};
pub use region::{locate, Membership, PreparedPolygon};
pub use ring::PreparedRing;
