pub mod config;
pub mod error;
pub mod event;
pub mod log;
pub mod rect;
pub mod surface;
pub mod synchronizer;
pub mod tracker;

pub use error::{OverlayError, WindowResult};
pub use event::{ActivationEvent, Event, GeometryEvent, Notification, WindowId};
pub use rect::{Point, Rect, Size};
pub use surface::{AnchorSurface, AncestorWindow, Listener, OverlayWindow, VideoSurface};
pub use synchronizer::OverlaySynchronizer;
pub use tracker::{ActivationTracker, GeometryTracker};
