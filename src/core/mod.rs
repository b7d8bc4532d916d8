//! Scene lifecycle, frame updates and the host seams they run against.

mod backend;
mod clock;
mod lifecycle;
mod resources;
mod surface;
mod updater;

pub use backend::{BackendFactory, GeometryData, GeometryId, MaterialId, RenderBackend};
pub use clock::{FrameClock, FrameToken, ManualClock};
pub use lifecycle::{LifecycleController, LifecycleError, Phase, TeardownReport};
pub use resources::ResourceLedger;
pub use surface::{RenderSurface, ResizeSubscription, SurfaceSize, TargetId};
pub use updater::{update_frame, update_hearts, update_particles, update_rose, DRIFT_LIMIT};
