use log::{debug, warn};
use notch_core::commands::MethodCall;
use notch_core::platform::headless::HeadlessPlatform;
use notch_core::platform::{EventBridge, NotchEvent, Position};
use notch_core::{MethodCallError, NotchHandle};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::thread;

/// Moves the simulated pointer. Only the host understands it; the controller never sees it.
pub const MOVE_POINTER: &str = "movePointer";

/// One line written back for each request line.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Result(Value),
    Error { code: String, message: String },
}

impl Response {
    fn error(code: &str, message: impl Into<String>) -> Self {
        Response::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<MethodCallError> for Response {
    fn from(error: MethodCallError) -> Self {
        Response::error(error.code(), error.to_string())
    }
}

#[derive(Debug, Serialize)]
struct EventLine {
    event: &'static str,
    arguments: Value,
}

impl From<&NotchEvent> for EventLine {
    fn from(event: &NotchEvent) -> Self {
        Self {
            event: event.method(),
            arguments: event.arguments(),
        }
    }
}

/// Serves the JSON-lines method channel on top of a headless screen.
pub struct Host {
    handle: NotchHandle,
    platform: HeadlessPlatform,
}

impl Host {
    pub fn new(handle: NotchHandle, platform: HeadlessPlatform) -> Self {
        Self { handle, platform }
    }

    /// Answers every line of `reader` until EOF or a read error.
    pub fn run<R: BufRead>(&self, reader: R) {
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    if let Some(response) = self.handle_line(&line) {
                        write_line(&response);
                    }
                }
                Err(e) => {
                    warn!("Failed to read request: {e}");
                    break;
                }
            }
        }
        debug!("Request stream closed");
    }

    /// Blank lines get no answer.
    pub fn handle_line(&self, line: &str) -> Option<Response> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let call: MethodCall = match serde_json::from_str(line) {
            Ok(call) => call,
            Err(e) => return Some(Response::error("INVALID_REQUEST", e.to_string())),
        };

        let response = if call.method == MOVE_POINTER {
            self.move_pointer(&call.arguments)
        } else {
            self.handle.handle_method_call(&call).map(|result| result.unwrap_or(Value::Null))
        };

        Some(match response {
            Ok(value) => Response::Result(value),
            Err(e) => e.into(),
        })
    }

    fn move_pointer(&self, arguments: &Value) -> Result<Value, MethodCallError> {
        let position = match arguments {
            Value::Null => None,
            Value::Object(args) => match (
                args.get("x").and_then(Value::as_f64),
                args.get("y").and_then(Value::as_f64),
            ) {
                (Some(x), Some(y)) => Some(Position::new(x, y)),
                _ => return Err(pointer_error()),
            },
            _ => return Err(pointer_error()),
        };

        self.platform.set_mouse_position(position);
        Ok(Value::Null)
    }
}

fn pointer_error() -> MethodCallError {
    MethodCallError::InvalidArguments {
        message: "Pointer x and y are required".to_string(),
    }
}

/// Prints every controller event as it arrives. The thread lives until the process exits.
pub fn spawn_event_printer(mut bridge: EventBridge) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("notch-events".to_string())
        .spawn(move || {
            while let Some(event) = bridge.blocking_next_event() {
                write_line(&EventLine::from(&event));
            }
        })
}

fn write_line<T: Serialize>(value: &T) {
    let line = match serde_json::to_string(value) {
        Ok(line) => line,
        Err(e) => {
            warn!("Failed to serialize output: {e}");
            return;
        }
    };

    let mut stdout = io::stdout().lock();
    if writeln!(stdout, "{line}").and_then(|_| stdout.flush()).is_err() {
        debug!("stdout is closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notch_core::event_loop::{ControllerMessage, NotchEventLoop};
    use notch_core::platform::{Bounds, PlatformImpl};
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn setup() -> (Host, HeadlessPlatform, UnboundedReceiver<ControllerMessage>) {
        let platform = HeadlessPlatform::new(Bounds::new(0.0, 0.0, 1440.0, 900.0));
        let (handle, receiver) = NotchEventLoop::channel(platform.version());
        (Host::new(handle, platform.clone()), platform, receiver)
    }

    fn to_json(response: Option<Response>) -> Value {
        serde_json::to_value(response.unwrap()).unwrap()
    }

    #[test]
    fn test_result_lines() {
        let (host, _platform, mut receiver) = setup();

        assert_eq!(
            to_json(host.handle_line(r#"{"method": "getPlatformVersion"}"#)),
            json!({"result": "Headless 1.0"})
        );
        assert_eq!(
            to_json(host.handle_line(r#"{"method": "setBlurIntensity", "arguments": 0.4}"#)),
            json!({"result": null})
        );
        assert!(receiver.try_recv().is_ok());
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_error_lines() {
        let (host, _platform, mut receiver) = setup();

        assert_eq!(
            to_json(host.handle_line(r#"{"method": "setWindowSize", "arguments": {"width": 10}}"#)),
            json!({"error": {
                "code": "INVALID_ARGUMENTS",
                "message": "Width and height are required"
            }})
        );
        assert_eq!(
            to_json(host.handle_line(r#"{"method": "fly"}"#)),
            json!({"error": {
                "code": "NOT_IMPLEMENTED",
                "message": "Method fly is not implemented"
            }})
        );

        let Some(Response::Error { code, .. }) = host.handle_line("not json") else {
            panic!("expected an error");
        };
        assert_eq!(code, "INVALID_REQUEST");
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let (host, _platform, _receiver) = setup();
        assert_eq!(host.handle_line("   "), None);
    }

    #[test]
    fn test_move_pointer() {
        let (host, platform, mut receiver) = setup();

        assert_eq!(
            host.handle_line(r#"{"method": "movePointer", "arguments": {"x": 720, "y": 880}}"#),
            Some(Response::Result(Value::Null))
        );
        assert_eq!(platform.state().mouse_position, Some(Position::new(720.0, 880.0)));

        host.handle_line(r#"{"method": "movePointer", "arguments": null}"#);
        assert_eq!(platform.state().mouse_position, None);

        let response = host.handle_line(r#"{"method": "movePointer", "arguments": {"x": 1}}"#);
        assert!(matches!(response, Some(Response::Error { .. })));
        assert!(receiver.try_recv().is_err());
    }
}
