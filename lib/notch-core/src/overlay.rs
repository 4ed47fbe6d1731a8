use crate::notch_path::{build_notch_path, NotchPath};
use crate::platform::{Bounds, PlatformImpl, PlatformOverlayImpl};
use log::{debug, trace};

/// Opacity at or below which the surface is torn down instead of shown.
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.01;

/// Shape a mask was built from, so unchanged shapes are not rebuilt.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MaskSource {
    width: f64,
    height: f64,
    radius: f64,
}

/// The live blur surface and the state last pushed to it.
pub struct OverlaySurface<O: PlatformOverlayImpl> {
    overlay: O,
    frame: Bounds,
    opacity: f64,
    mask: Option<NotchPath>,
    mask_source: Option<MaskSource>,
}

impl<O: PlatformOverlayImpl> OverlaySurface<O> {
    fn new(overlay: O, frame: Bounds) -> Self {
        Self {
            overlay,
            frame,
            opacity: 0.0,
            mask: None,
            mask_source: None,
        }
    }

    pub fn frame(&self) -> Bounds {
        self.frame
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// The installed mask, in the surface's bottom-left origin space.
    pub fn mask(&self) -> Option<&NotchPath> {
        self.mask.as_ref()
    }

    fn set_frame(&mut self, frame: Bounds) {
        if frame.is_empty() || frame == self.frame {
            return;
        }
        self.frame = frame;
        self.overlay.set_frame(&frame);
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity;
        self.overlay.set_opacity(opacity);
    }

    fn update_mask(&mut self, radius: f64) {
        let source = MaskSource {
            width: self.frame.size.width,
            height: self.frame.size.height,
            radius,
        };
        if self.mask_source == Some(source) {
            return;
        }

        let path = build_notch_path(source.width, source.height, source.radius);
        let mask = path.flipped(source.height).unwrap_or_else(|| {
            debug!("Could not flip notch mask, installing it untransformed");
            path
        });

        trace!(
            "Installing notch mask {}x{} r{}",
            source.width,
            source.height,
            source.radius
        );
        self.overlay.set_mask(&mask);
        self.mask = Some(mask);
        self.mask_source = Some(source);
    }
}

/// Owns the single optional blur surface behind the notch content.
pub struct OverlaySurfaceManager<O: PlatformOverlayImpl> {
    surface: Option<OverlaySurface<O>>,
    visibility_threshold: f64,
}

impl<O: PlatformOverlayImpl> OverlaySurfaceManager<O> {
    pub fn new(visibility_threshold: f64) -> Self {
        Self {
            surface: None,
            visibility_threshold,
        }
    }

    pub fn surface(&self) -> Option<&OverlaySurface<O>> {
        self.surface.as_ref()
    }

    /// Creates, updates or removes the surface so that it shows `intensity` over
    /// `frame`, clipped to the notch shape with the given bottom radius.
    ///
    /// An empty `frame` keeps the current one. Without a `parent` nothing happens.
    pub fn set_overlay<P>(
        &mut self,
        platform: &P,
        parent: Option<&P::Window>,
        frame: Bounds,
        intensity: f64,
        radius: f64,
    ) where
        P: PlatformImpl<Overlay = O>,
    {
        let Some(parent) = parent else {
            trace!("No parent window for overlay");
            return;
        };

        // NaN intensities hide the surface as well.
        if !(intensity > self.visibility_threshold) {
            self.remove();
            return;
        }

        match &mut self.surface {
            Some(surface) => surface.set_frame(frame),
            None => match platform.create_overlay(parent, &frame) {
                Ok(overlay) => {
                    debug!("Created overlay surface");
                    self.surface = Some(OverlaySurface::new(overlay, frame));
                }
                Err(e) => {
                    debug!("Could not create overlay surface: {e}");
                    return;
                }
            },
        }

        if let Some(surface) = &mut self.surface {
            surface.set_opacity(intensity);
            surface.update_mask(radius);
        }
    }

    /// Follows a window geometry change. Does nothing while there is no surface.
    pub fn sync(&mut self, frame: Bounds, radius: f64) {
        if let Some(surface) = &mut self.surface {
            surface.set_frame(frame);
            surface.update_mask(radius);
        }
    }

    /// Detaches the surface and drops its mask.
    pub fn remove(&mut self) {
        if let Some(surface) = self.surface.take() {
            surface.overlay.remove();
            debug!("Removed overlay surface");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{HeadlessOverlay, HeadlessPlatform};

    fn setup() -> (HeadlessPlatform, OverlaySurfaceManager<HeadlessOverlay>) {
        let platform = HeadlessPlatform::new(Bounds::new(0.0, 0.0, 1440.0, 900.0));
        (platform, OverlaySurfaceManager::new(DEFAULT_VISIBILITY_THRESHOLD))
    }

    fn expected_mask(width: f64, height: f64, radius: f64) -> NotchPath {
        build_notch_path(width, height, radius)
            .flipped(height)
            .unwrap()
    }

    #[test]
    fn test_creates_surface_with_mask() {
        let (platform, mut manager) = setup();
        let window = platform.main_window();
        manager.set_overlay(&platform, window.as_ref(), Bounds::from_size(200.0, 40.0), 0.75, 12.0);

        let surface = manager.surface().expect("surface");
        assert_eq!(surface.opacity(), 0.75);
        assert_eq!(surface.frame(), Bounds::from_size(200.0, 40.0));
        assert_eq!(surface.mask(), Some(&expected_mask(200.0, 40.0, 12.0)));

        let state = platform.state();
        let overlay = state.attached_overlay().unwrap();
        assert_eq!(overlay.opacity, 0.75);
        assert_eq!(overlay.mask, Some(expected_mask(200.0, 40.0, 12.0)));
    }

    #[test]
    fn test_low_intensity_removes_surface() {
        let (platform, mut manager) = setup();
        let window = platform.main_window();
        manager.set_overlay(&platform, window.as_ref(), Bounds::from_size(130.0, 30.0), 1.0, 10.0);
        manager.set_overlay(&platform, window.as_ref(), Bounds::from_size(130.0, 30.0), 0.01, 10.0);

        assert!(manager.surface().is_none());
        assert!(platform.state().attached_overlay().is_none());
    }

    #[test]
    fn test_low_intensity_without_surface_creates_nothing() {
        let (platform, mut manager) = setup();
        let window = platform.main_window();
        manager.set_overlay(&platform, window.as_ref(), Bounds::from_size(130.0, 30.0), 0.0, 10.0);
        let frame = Bounds::from_size(130.0, 30.0);
        manager.set_overlay(&platform, window.as_ref(), frame, f64::NAN, 10.0);

        assert!(manager.surface().is_none());
        assert!(platform.state().overlays.is_empty());
    }

    #[test]
    fn test_identical_calls_are_idempotent() {
        let (platform, mut manager) = setup();
        let window = platform.main_window();
        let frame = Bounds::from_size(200.0, 40.0);

        manager.set_overlay(&platform, window.as_ref(), frame, 0.5, 12.0);
        let first = manager.surface().unwrap().mask().cloned();
        manager.set_overlay(&platform, window.as_ref(), frame, 0.5, 12.0);

        assert_eq!(manager.surface().unwrap().mask().cloned(), first);
        let state = platform.state();
        assert_eq!(state.overlays.len(), 1);
        assert_eq!(state.overlays[0].mask_updates, 1);
    }

    #[test]
    fn test_teardown_and_recreate_matches_clean_state() {
        let (platform, mut manager) = setup();
        let window = platform.main_window();
        let frame = Bounds::from_size(200.0, 40.0);

        manager.set_overlay(&platform, window.as_ref(), Bounds::from_size(300.0, 60.0), 1.0, 20.0);
        manager.set_overlay(&platform, window.as_ref(), frame, 0.0, 20.0);
        manager.set_overlay(&platform, window.as_ref(), frame, 1.0, 12.0);

        let (clean_platform, mut clean_manager) = setup();
        let clean_window = clean_platform.main_window();
        clean_manager.set_overlay(&clean_platform, clean_window.as_ref(), frame, 1.0, 12.0);

        assert_eq!(
            manager.surface().unwrap().mask(),
            clean_manager.surface().unwrap().mask()
        );
        let state = platform.state();
        assert_eq!(state.overlays_created, 2);
        assert_eq!(state.overlays.len(), 1);
        assert_eq!(state.overlays[0].mask, Some(expected_mask(200.0, 40.0, 12.0)));
    }

    #[test]
    fn test_empty_frame_keeps_existing_frame() {
        let (platform, mut manager) = setup();
        let window = platform.main_window();
        manager.set_overlay(&platform, window.as_ref(), Bounds::from_size(200.0, 40.0), 1.0, 10.0);
        manager.set_overlay(&platform, window.as_ref(), Bounds::default(), 0.3, 10.0);

        let surface = manager.surface().unwrap();
        assert_eq!(surface.frame(), Bounds::from_size(200.0, 40.0));
        assert_eq!(surface.opacity(), 0.3);
    }

    #[test]
    fn test_missing_parent_is_noop() {
        let (platform, mut manager) = setup();
        let window = platform.main_window();
        manager.set_overlay(&platform, window.as_ref(), Bounds::from_size(200.0, 40.0), 1.0, 10.0);
        manager.set_overlay(&platform, None, Bounds::from_size(200.0, 40.0), 0.0, 10.0);

        assert!(manager.surface().is_some());
    }

    #[test]
    fn test_missing_content_view_is_noop() {
        let (platform, mut manager) = setup();
        platform.state().window.as_mut().unwrap().has_content_view = false;
        let window = platform.main_window();
        manager.set_overlay(&platform, window.as_ref(), Bounds::from_size(200.0, 40.0), 1.0, 10.0);

        assert!(manager.surface().is_none());
    }

    #[test]
    fn test_sync_rebuilds_mask_for_new_shape() {
        let (platform, mut manager) = setup();
        let window = platform.main_window();
        manager.set_overlay(&platform, window.as_ref(), Bounds::from_size(200.0, 40.0), 1.0, 10.0);
        manager.sync(Bounds::from_size(300.0, 50.0), 20.0);

        let surface = manager.surface().unwrap();
        assert_eq!(surface.frame(), Bounds::from_size(300.0, 50.0));
        assert_eq!(surface.mask(), Some(&expected_mask(300.0, 50.0, 20.0)));
        assert_eq!(
            platform.state().attached_overlay().unwrap().frame,
            Bounds::from_size(300.0, 50.0)
        );
    }

    #[test]
    fn test_sync_without_surface_is_noop() {
        let (platform, mut manager) = setup();
        manager.sync(Bounds::from_size(300.0, 50.0), 20.0);
        assert!(manager.surface().is_none());
        assert!(platform.state().overlays.is_empty());
    }

    #[test]
    fn test_non_finite_height_installs_untransformed_mask() {
        let (platform, mut manager) = setup();
        let window = platform.main_window();
        let frame = Bounds::from_size(200.0, f64::INFINITY);
        manager.set_overlay(&platform, window.as_ref(), frame, 1.0, 10.0);

        let surface = manager.surface().unwrap();
        assert_eq!(
            surface.mask(),
            Some(&build_notch_path(200.0, f64::INFINITY, 10.0))
        );
    }
}
