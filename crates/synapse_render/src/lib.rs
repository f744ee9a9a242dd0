//! Synapse Render Surface
//!
//! The field never draws by itself. A [`RenderSurface`] receives the point
//! and line buffers plus the valid line range each frame; [`FieldHost`] ties
//! the frame driver, the surface and the input subscriptions together.

pub mod batch;
pub mod headless;
pub mod host;
pub mod surface;

pub use batch::{LineBatch, PointBatch};
pub use headless::HeadlessSurface;
pub use host::{FieldHost, HostError};
pub use surface::{RenderSurface, SurfaceError};
