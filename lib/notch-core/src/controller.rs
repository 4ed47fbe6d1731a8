use crate::animation::{ease_out_back, Animator};
use crate::commands::NotchCommand;
use crate::config::Config;
use crate::geometry::Geometry;
use crate::hover::HoverZoneDetector;
use crate::overlay::OverlaySurfaceManager;
use crate::platform::{Bounds, EventDispatcher, NotchEvent, PlatformImpl, PlatformWindowImpl};
use log::{debug, trace, warn};
use std::time::Duration;
use tokio::time::Instant;

/// Owns the notch window's shape, its blur overlay, the running animation and the hover
/// state. Lives on a single thread; every method runs to completion before the next.
pub struct NotchController<P: PlatformImpl> {
    platform: P,
    config: Config,
    /// Last geometry pushed through `apply_geometry`. Used to rebuild the overlay when
    /// a command brings no dimensions of its own.
    geometry: Geometry,
    overlay: OverlaySurfaceManager<P::Overlay>,
    animator: Animator<Geometry>,
    hover: HoverZoneDetector,
    events: EventDispatcher,
}

impl<P: PlatformImpl> NotchController<P> {
    pub fn new(platform: P, config: Config, events: EventDispatcher) -> Self {
        let geometry = Geometry::new(
            config.default_width,
            config.default_height,
            config.default_radius,
        );

        Self {
            overlay: OverlaySurfaceManager::new(config.blur_visibility_threshold),
            animator: Animator::new(geometry, ease_out_back),
            hover: HoverZoneDetector::new(config.trigger_zone()),
            platform,
            config,
            geometry,
            events,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn animator(&self) -> &Animator<Geometry> {
        &self.animator
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn is_hovering(&self) -> bool {
        self.hover.is_inside()
    }

    /// Runs a command. Returns true when it started a new animation run that needs a
    /// fresh tick timer.
    pub fn execute(&mut self, command: NotchCommand, now: Instant) -> bool {
        debug!("Executing {command:?}");
        let default_radius = self.config.default_radius;

        match command {
            NotchCommand::GetPlatformVersion => {}
            NotchCommand::EnableNotchMode {
                width,
                height,
                blur_intensity,
            } => self.enable_notch_mode(
                width.unwrap_or(self.config.default_width),
                height.unwrap_or(self.config.default_height),
                blur_intensity.unwrap_or(self.config.default_blur_intensity),
            ),
            NotchCommand::SetWindowSize {
                width,
                height,
                radius,
            } => self.set_window_size(Geometry::new(
                width,
                height,
                radius.unwrap_or(default_radius),
            )),
            NotchCommand::SetBlurIntensity(intensity) => self.set_blur_intensity(intensity),
            NotchCommand::AnimateWindow {
                width,
                height,
                radius,
                duration,
            } => {
                let target = Geometry::new(width, height, radius.unwrap_or(default_radius));
                return self.animate_window(target, duration, now);
            }
            NotchCommand::SetScreenshareVisibility(visible) => {
                self.set_screenshare_visibility(visible)
            }
        }

        false
    }

    pub fn enable_notch_mode(&mut self, width: f64, height: f64, blur_intensity: f64) {
        self.geometry = Geometry::new(width, height, self.geometry.radius).clamped();

        let Some(window) = self.platform.main_window() else {
            debug!("No window to enable notch mode on");
            return;
        };

        if let Err(e) = window.apply_notch_style() {
            warn!("Could not apply notch window style: {e}");
        }

        let geometry = Geometry::new(width, height, self.config.default_radius);
        self.overlay.set_overlay(
            &self.platform,
            Some(&window),
            Bounds::from_size(width, height),
            blur_intensity,
            geometry.radius,
        );

        self.apply_geometry(geometry, Some(window.clone()));

        if let Err(e) = window.order_front() {
            warn!("Could not order notch window front: {e}");
        }
    }

    pub fn set_window_size(&mut self, geometry: Geometry) {
        self.apply_geometry(geometry, None);
    }

    /// Shows, hides or restyles the blur. When the surface was torn down earlier it is
    /// rebuilt from the last applied geometry.
    pub fn set_blur_intensity(&mut self, intensity: f64) {
        let Some(window) = self.platform.main_window() else {
            trace!("No window for blur intensity change");
            return;
        };

        let frame = self
            .overlay
            .surface()
            .map(|surface| surface.frame())
            .filter(|frame| !frame.is_empty())
            .unwrap_or_else(|| Bounds::from_size(self.geometry.width, self.geometry.height));

        self.overlay.set_overlay(
            &self.platform,
            Some(&window),
            frame,
            intensity,
            self.geometry.radius,
        );
    }

    /// Starts an ease-out-back transition from the current shape to `target`. Replaces
    /// any transition in progress. Non-positive durations apply `target` immediately.
    pub fn animate_window(&mut self, target: Geometry, duration_secs: f64, now: Instant) -> bool {
        let Some(window) = self.platform.main_window() else {
            debug!("No window to animate");
            return false;
        };

        let frame = window.frame();
        let start = Geometry::new(frame.size.width, frame.size.height, self.geometry.radius);

        let duration = match Duration::try_from_secs_f64(duration_secs) {
            Ok(duration) if !duration.is_zero() => duration,
            _ => {
                trace!("Snapping to {target:?} without animation");
                self.animator.stop();
                self.apply_geometry(target, Some(window));
                return false;
            }
        };

        debug!("Animating {start:?} -> {target:?} over {duration:?}");
        self.animator.start_from(start, target, duration, now);
        true
    }

    /// Advances the running animation to `now` and applies the resulting shape.
    pub fn on_animation_tick(&mut self, now: Instant) {
        if let Some(geometry) = self.animator.update(now) {
            trace!("Animation tick {geometry:?}");
            self.apply_geometry(geometry, None);
        }
    }

    pub fn set_screenshare_visibility(&mut self, visible: bool) {
        let Some(window) = self.platform.main_window() else {
            trace!("No window for screenshare visibility change");
            return;
        };

        if let Err(e) = window.set_capture_visible(visible) {
            warn!("Could not change screenshare visibility: {e}");
        }
    }

    /// Samples the pointer and notifies the host when it crossed the trigger zone edge.
    pub fn poll_hover(&mut self) {
        let position = self.platform.mouse_position();
        let screen = self.platform.primary_display().map(|display| display.bounds);

        if let Some(inside) = self.hover.poll(position, screen.as_ref()) {
            self.events.send(NotchEvent::HoverZone(inside));
        }
    }

    /// Places the window for `geometry` at the top center of the primary display and
    /// reshapes the overlay to match.
    pub fn apply_geometry(&mut self, geometry: Geometry, window: Option<P::Window>) {
        let geometry = geometry.clamped();
        self.geometry = geometry;

        let Some(window) = window.or_else(|| self.platform.main_window()) else {
            trace!("No window to apply geometry to");
            return;
        };
        let Some(display) = self.platform.primary_display() else {
            trace!("No display to anchor the notch to");
            return;
        };

        let frame = geometry.anchored_frame(&display.bounds);
        if let Err(e) = window.set_frame(&frame) {
            warn!("Could not set notch window frame: {e}");
        }

        let content = window
            .content_bounds()
            .unwrap_or_else(|| Bounds::from_size(geometry.width, geometry.height));
        self.overlay.sync(content, geometry.radius);
    }

    /// Stops the animation and releases the overlay.
    pub fn teardown(&mut self) {
        self.animator.stop();
        self.overlay.remove();
    }
}
