//! Row-based placement architecture for the detailed placer.
//!
//! The [`Architecture`] is the immutable spatial substrate every move is
//! validated against: the die outline, the placement [`Row`]s with their site
//! pitch and orientation, the fence [`Region`]s, and the edge-type spacing
//! rules between abutting cells. All coordinates are integer database units.

#![warn(missing_docs)]

pub mod architecture;
pub mod ids;
pub mod orient;
pub mod rect;
pub mod types;

pub use architecture::Architecture;
pub use ids::RegionId;
pub use orient::Orientation;
pub use rect::Rect;
pub use types::{EdgeSpacingRule, Region, Row};
