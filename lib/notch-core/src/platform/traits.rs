use crate::notch_path::NotchPath;
use crate::platform::{Bounds, Display, PlatformResult, Position};

/// The host environment the controller runs against. All methods are called from the
/// controller's event loop thread only.
pub trait PlatformImpl {
    type Window: PlatformWindowImpl;
    type Overlay: PlatformOverlayImpl;

    /// Human readable name and version of the platform, e.g. `macOS 14.5`.
    fn version(&self) -> String;

    /// The window the controller is bound to, falling back to the application's
    /// first window. `None` when the host has no window yet.
    fn main_window(&self) -> Option<Self::Window>;

    /// The display holding the menu bar.
    fn primary_display(&self) -> Option<Display>;

    /// The global pointer location in screen space, if it can be read.
    fn mouse_position(&self) -> Option<Position>;

    /// Creates a blurred translucent surface behind every other subview of the
    /// window's content view, with a mask channel attached and no mask installed.
    /// Fails with `PlatformErrorType::NoContentView` when there is nothing to
    /// attach to.
    fn create_overlay(&self, parent: &Self::Window, frame: &Bounds)
        -> PlatformResult<Self::Overlay>;
}

/// Should be lightweight, and freely copyable
pub trait PlatformWindowImpl: Clone {
    fn frame(&self) -> Bounds;

    /// Bounds of the content view in window-local coordinates.
    fn content_bounds(&self) -> Option<Bounds>;

    /// Moves and resizes the window immediately, without any window system animation.
    fn set_frame(&self, frame: &Bounds) -> PlatformResult<()>;

    /// Borderless, transparent, shadowless, above normal windows and present on
    /// every space.
    fn apply_notch_style(&self) -> PlatformResult<()>;

    fn order_front(&self) -> PlatformResult<()>;

    /// Whether the window shows up in screen captures and screen sharing.
    fn set_capture_visible(&self, visible: bool) -> PlatformResult<()>;
}

pub trait PlatformOverlayImpl {
    fn set_frame(&mut self, frame: &Bounds);
    fn set_opacity(&mut self, opacity: f64);
    /// Installs the clip mask. The path is already in the surface's coordinate space.
    fn set_mask(&mut self, mask: &NotchPath);
    /// Detaches the surface from its parent and releases the mask.
    fn remove(self);
}
