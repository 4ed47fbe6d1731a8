//! In-memory platform. Backs the `notch` CLI's simulated screen and lets tests observe
//! every effect the controller has on the window and its overlay.

use crate::notch_path::NotchPath;
use crate::platform::{
    Bounds, Display, PlatformErrorType, PlatformImpl, PlatformOverlayImpl, PlatformResult,
    PlatformWindowImpl, Position,
};
use log::trace;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub struct HeadlessWindowState {
    pub frame: Bounds,
    pub has_content_view: bool,
    pub notch_style: bool,
    pub ordered_front: bool,
    pub capture_visible: bool,
    pub frame_updates: usize,
}

impl Default for HeadlessWindowState {
    fn default() -> Self {
        Self {
            frame: Bounds::new(0.0, 0.0, 800.0, 600.0),
            has_content_view: true,
            notch_style: false,
            ordered_front: false,
            capture_visible: true,
            frame_updates: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessOverlayState {
    pub id: usize,
    pub frame: Bounds,
    pub opacity: f64,
    pub mask: Option<NotchPath>,
    pub mask_updates: usize,
}

#[derive(Debug, Default)]
pub struct HeadlessState {
    pub version: String,
    pub window: Option<HeadlessWindowState>,
    pub display: Option<Display>,
    pub mouse_position: Option<Position>,
    /// Overlays still attached to the window, in creation order.
    pub overlays: Vec<HeadlessOverlayState>,
    /// Number of overlays created so far, removed ones included.
    pub overlays_created: usize,
}

impl HeadlessState {
    /// The overlay currently attached to the window, if any.
    pub fn attached_overlay(&self) -> Option<&HeadlessOverlayState> {
        self.overlays.last()
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessPlatform {
    /// A platform with one window and one display covering `display_bounds`.
    pub fn new(display_bounds: Bounds) -> Self {
        let state = HeadlessState {
            version: "Headless 1.0".to_string(),
            window: Some(HeadlessWindowState::default()),
            display: Some(Display {
                id: 1,
                name: "Headless Display".to_string(),
                bounds: display_bounds,
            }),
            mouse_position: None,
            overlays: Vec::new(),
            overlays_created: 0,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, HeadlessState> {
        lock(&self.state)
    }

    pub fn set_mouse_position(&self, position: Option<Position>) {
        self.state().mouse_position = position;
    }
}

fn lock(state: &Mutex<HeadlessState>) -> MutexGuard<'_, HeadlessState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl PlatformImpl for HeadlessPlatform {
    type Window = HeadlessWindow;
    type Overlay = HeadlessOverlay;

    fn version(&self) -> String {
        self.state().version.clone()
    }

    fn main_window(&self) -> Option<HeadlessWindow> {
        self.state().window.as_ref().map(|_| HeadlessWindow {
            state: self.state.clone(),
        })
    }

    fn primary_display(&self) -> Option<Display> {
        self.state().display.clone()
    }

    fn mouse_position(&self) -> Option<Position> {
        self.state().mouse_position
    }

    fn create_overlay(
        &self,
        parent: &HeadlessWindow,
        frame: &Bounds,
    ) -> PlatformResult<HeadlessOverlay> {
        let mut state = lock(&parent.state);
        let has_content_view = state
            .window
            .as_ref()
            .is_some_and(|window| window.has_content_view);
        if !has_content_view {
            return Err(PlatformErrorType::NoContentView.into());
        }

        let id = state.overlays_created;
        state.overlays_created += 1;
        state.overlays.push(HeadlessOverlayState {
            id,
            frame: *frame,
            ..Default::default()
        });
        trace!("Created headless overlay {id}");

        Ok(HeadlessOverlay {
            state: parent.state.clone(),
            id,
        })
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessWindow {
    fn update<F>(&self, f: F) -> PlatformResult<()>
    where
        F: FnOnce(&mut HeadlessWindowState),
    {
        let mut state = lock(&self.state);
        let window = state.window.as_mut().ok_or("Window was closed")?;
        f(window);
        Ok(())
    }
}

impl PlatformWindowImpl for HeadlessWindow {
    fn frame(&self) -> Bounds {
        lock(&self.state)
            .window
            .as_ref()
            .map(|window| window.frame)
            .unwrap_or_default()
    }

    fn content_bounds(&self) -> Option<Bounds> {
        lock(&self.state)
            .window
            .as_ref()
            .filter(|window| window.has_content_view)
            .map(|window| Bounds::from_size(window.frame.size.width, window.frame.size.height))
    }

    fn set_frame(&self, frame: &Bounds) -> PlatformResult<()> {
        self.update(|window| {
            window.frame = *frame;
            window.frame_updates += 1;
        })
    }

    fn apply_notch_style(&self) -> PlatformResult<()> {
        self.update(|window| window.notch_style = true)
    }

    fn order_front(&self) -> PlatformResult<()> {
        self.update(|window| window.ordered_front = true)
    }

    fn set_capture_visible(&self, visible: bool) -> PlatformResult<()> {
        self.update(|window| window.capture_visible = visible)
    }
}

#[derive(Debug)]
pub struct HeadlessOverlay {
    state: Arc<Mutex<HeadlessState>>,
    id: usize,
}

impl HeadlessOverlay {
    fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut HeadlessOverlayState),
    {
        let mut state = lock(&self.state);
        if let Some(overlay) = state.overlays.iter_mut().find(|overlay| overlay.id == self.id) {
            f(overlay);
        }
    }
}

impl PlatformOverlayImpl for HeadlessOverlay {
    fn set_frame(&mut self, frame: &Bounds) {
        self.update(|overlay| overlay.frame = *frame);
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.update(|overlay| overlay.opacity = opacity);
    }

    fn set_mask(&mut self, mask: &NotchPath) {
        self.update(|overlay| {
            overlay.mask = Some(mask.clone());
            overlay.mask_updates += 1;
        });
    }

    fn remove(self) {
        lock(&self.state).overlays.retain(|overlay| overlay.id != self.id);
        trace!("Removed headless overlay {}", self.id);
    }
}
