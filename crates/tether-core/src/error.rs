use thiserror::Error;

/// A boxed error type for native window queries.
///
/// Platform crates surface OS failures through this alias; the engine
/// only logs them.
pub type WindowResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Errors reported synchronously by [`OverlaySynchronizer`](crate::OverlaySynchronizer).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OverlayError {
    /// The current video surface is not component-backed, so there is
    /// no on-screen region for an overlay to track.
    #[error("overlays require a component-backed video surface")]
    UnsupportedSurface,

    /// The anchor surface is not attached to a top-level window yet.
    #[error("the anchor surface has no ancestor window")]
    NoAncestorWindow,
}
