use crate::event_loop::{ControllerMessage, NotchEventLoop};
use crate::platform::{EventBridge, PlatformImpl};
use log::error;
use std::thread;
use tokio::sync::mpsc;

pub mod animation;
pub mod commands;
pub mod config;
pub mod controller;
pub mod event_loop;
pub mod geometry;
pub mod hover;
pub mod notch_path;
pub mod overlay;
pub mod paths;
pub mod platform;

pub use commands::{MethodCall, MethodCallError, MethodResult, NotchCommand};
pub use config::Config;
pub use controller::NotchController;
pub use event_loop::NotchHandle;
pub use geometry::Geometry;

pub fn version() -> &'static str {
    option_env!("VERSION").unwrap_or("v0.0.0-dev")
}

/// A controller running on its own `notch-ui` thread.
pub struct NotchRuntime {
    handle: NotchHandle,
    thread: Option<thread::JoinHandle<()>>,
}

impl NotchRuntime {
    pub fn handle(&self) -> NotchHandle {
        self.handle.clone()
    }

    /// Waits for the event loop to exit. Call [`NotchHandle::shutdown`] first.
    pub fn join(mut self) -> NotchResult<()> {
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| "Notch event loop panicked".into()),
            None => Ok(()),
        }
    }
}

impl Drop for NotchRuntime {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.handle.shutdown();
            let _ = thread.join();
        }
    }
}

/// Starts a controller for `platform` on a dedicated thread. Every window and overlay
/// mutation happens on that thread; the returned handle can be used from anywhere.
pub fn start<P>(platform: P, config: Config) -> NotchResult<(NotchRuntime, EventBridge)>
where
    P: PlatformImpl + Send + 'static,
{
    let bridge = EventBridge::new();
    let (handle, receiver) = NotchEventLoop::channel(platform.version());
    let dispatcher = bridge.dispatcher();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to build notch runtime: {e}"))?;

    let thread = thread::Builder::new()
        .name("notch-ui".to_string())
        .spawn(move || {
            // Built on the UI thread so overlays never cross threads.
            let controller = NotchController::new(platform, config, dispatcher);
            run_event_loop(runtime, controller, receiver)
        })
        .map_err(|e| format!("Failed to spawn notch thread: {e}"))?;

    Ok((
        NotchRuntime {
            handle,
            thread: Some(thread),
        },
        bridge,
    ))
}

fn run_event_loop<P: PlatformImpl>(
    runtime: tokio::runtime::Runtime,
    controller: NotchController<P>,
    receiver: mpsc::UnboundedReceiver<ControllerMessage>,
) {
    runtime.block_on(NotchEventLoop::run(controller, receiver));
}

#[derive(Debug)]
pub enum NotchFatalError {
    Error(String),
}

pub type NotchResult<T> = Result<T, NotchFatalError>;

impl std::fmt::Display for NotchFatalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotchFatalError::Error(message) => write!(f, "{message}"),
        }
    }
}

impl From<&str> for NotchFatalError {
    fn from(value: &str) -> Self {
        NotchFatalError::Error(value.to_owned())
    }
}

impl From<String> for NotchFatalError {
    fn from(error: String) -> Self {
        error!("{error}");
        NotchFatalError::Error(error)
    }
}
