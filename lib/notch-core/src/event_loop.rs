use crate::commands::{MethodCall, MethodResult, NotchCommand};
use crate::controller::NotchController;
use crate::platform::PlatformImpl;
use log::{debug, trace};
use serde_json::Value;
use std::future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

#[derive(Debug)]
pub enum ControllerMessage {
    Command(NotchCommand),
    Shutdown,
}

/// Thread-safe entry point for the host's dispatch boundary. Validates calls right away
/// and queues them for the event loop without waiting for them to run.
#[derive(Clone)]
pub struct NotchHandle {
    sender: mpsc::UnboundedSender<ControllerMessage>,
    platform_version: Arc<str>,
}

impl NotchHandle {
    pub fn handle_method_call(&self, call: &MethodCall) -> MethodResult {
        let command = NotchCommand::parse(call)?;

        if matches!(command, NotchCommand::GetPlatformVersion) {
            return Ok(Some(Value::String(self.platform_version.to_string())));
        }

        self.send(ControllerMessage::Command(command));
        Ok(None)
    }

    pub fn shutdown(&self) {
        self.send(ControllerMessage::Shutdown);
    }

    fn send(&self, message: ControllerMessage) {
        // If send fails, then the event loop has already exited.
        if self.sender.send(message).is_err() {
            debug!("Notch event loop is gone, dropping message");
        }
    }
}

pub struct NotchEventLoop {}

impl NotchEventLoop {
    pub fn channel(
        platform_version: impl Into<Arc<str>>,
    ) -> (NotchHandle, mpsc::UnboundedReceiver<ControllerMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = NotchHandle {
            sender,
            platform_version: platform_version.into(),
        };
        (handle, receiver)
    }

    /// Runs the controller until shutdown. Commands, hover polls and animation ticks
    /// are all handled on this one task, so they never interleave.
    pub async fn run<P: PlatformImpl>(
        mut controller: NotchController<P>,
        mut receiver: mpsc::UnboundedReceiver<ControllerMessage>,
    ) {
        trace!("Handling notch commands...");

        let animation_tick = controller.config().animation_tick();
        let mut hover_timer = time::interval(controller.config().hover_poll_interval());
        hover_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut animation_timer: Option<Interval> = None;

        loop {
            tokio::select! {
                message = receiver.recv() => match message {
                    Some(ControllerMessage::Command(command)) => {
                        if controller.execute(command, Instant::now()) {
                            let first_tick = Instant::now() + animation_tick;
                            let mut timer = time::interval_at(first_tick, animation_tick);
                            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
                            animation_timer = Some(timer);
                        } else if !controller.is_animating() {
                            animation_timer = None;
                        }
                    }
                    Some(ControllerMessage::Shutdown) | None => break,
                },
                _ = hover_timer.tick() => controller.poll_hover(),
                _ = next_tick(&mut animation_timer) => {
                    controller.on_animation_tick(Instant::now());
                    if !controller.is_animating() {
                        animation_timer = None;
                    }
                }
            }
        }

        debug!("Notch event loop shutting down");
        controller.teardown();
    }
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => future::pending().await,
    }
}
