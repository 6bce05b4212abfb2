//! Life Map core.
//!
//! Headless pieces of the Life Map mind-mapping tool: edge anchoring for
//! circle, rectangle and cloud shapes, the map document with its editing
//! operations, persistence (local slot, binary snapshot, project store) and
//! SVG export.
//!
//! The binary `lifemap` exposes these from the command line.

pub mod error;
pub mod export;
pub mod geometry;
pub mod model;
pub mod palette;
pub mod routing;
pub mod store;

pub use error::{MapError, StoreError};
pub use geometry::{Anchor, AnchorResult, Dimensions, Point, Shape, ShapeKind, resolve_anchors};
pub use model::{Connection, LifeMap, MapDoc, MapEdge, MapNode, Viewport};
