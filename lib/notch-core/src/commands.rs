use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub const GET_PLATFORM_VERSION: &str = "getPlatformVersion";
pub const ENABLE_NOTCH_MODE: &str = "enableNotchMode";
pub const SET_WINDOW_SIZE: &str = "setWindowSize";
pub const SET_BLUR_INTENSITY: &str = "setBlurIntensity";
pub const ANIMATE_WINDOW: &str = "animateWindow";
pub const SET_SCREENSHARE_VISIBILITY: &str = "setScreenshareVisibility";

/// A call arriving from the host's dispatch boundary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MethodCallError {
    #[error("{message}")]
    InvalidArguments { message: String },
    #[error("Method {0} is not implemented")]
    NotImplemented(String),
}

impl MethodCallError {
    fn invalid(message: &str) -> Self {
        MethodCallError::InvalidArguments {
            message: message.to_string(),
        }
    }

    /// Machine readable error code reported to the host.
    pub fn code(&self) -> &'static str {
        match self {
            MethodCallError::InvalidArguments { .. } => "INVALID_ARGUMENTS",
            MethodCallError::NotImplemented(_) => "NOT_IMPLEMENTED",
        }
    }
}

/// Successful calls answer with an optional payload.
pub type MethodResult = Result<Option<Value>, MethodCallError>;

/// A validated command. Optional values left as `None` are filled from the config by
/// the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum NotchCommand {
    GetPlatformVersion,
    EnableNotchMode {
        width: Option<f64>,
        height: Option<f64>,
        blur_intensity: Option<f64>,
    },
    SetWindowSize {
        width: f64,
        height: f64,
        radius: Option<f64>,
    },
    SetBlurIntensity(f64),
    AnimateWindow {
        width: f64,
        height: f64,
        radius: Option<f64>,
        /// Seconds.
        duration: f64,
    },
    SetScreenshareVisibility(bool),
}

impl NotchCommand {
    pub fn parse(call: &MethodCall) -> Result<Self, MethodCallError> {
        let arguments = call.arguments.as_object();
        let number = |key: &str| arguments.and_then(|args| number_arg(args, key));

        match call.method.as_str() {
            GET_PLATFORM_VERSION => Ok(NotchCommand::GetPlatformVersion),
            ENABLE_NOTCH_MODE => Ok(NotchCommand::EnableNotchMode {
                width: number("width"),
                height: number("height"),
                blur_intensity: number("blurIntensity"),
            }),
            SET_WINDOW_SIZE => match (number("width"), number("height")) {
                (Some(width), Some(height)) => Ok(NotchCommand::SetWindowSize {
                    width,
                    height,
                    radius: number("radius"),
                }),
                _ => Err(MethodCallError::invalid("Width and height are required")),
            },
            SET_BLUR_INTENSITY => call
                .arguments
                .as_f64()
                .map(NotchCommand::SetBlurIntensity)
                .ok_or_else(|| MethodCallError::invalid("Intensity required")),
            ANIMATE_WINDOW => match (number("width"), number("height"), number("duration")) {
                (Some(width), Some(height), Some(duration)) => Ok(NotchCommand::AnimateWindow {
                    width,
                    height,
                    radius: number("radius"),
                    duration,
                }),
                _ => Err(MethodCallError::invalid("Arguments missing")),
            },
            SET_SCREENSHARE_VISIBILITY => call
                .arguments
                .as_bool()
                .map(NotchCommand::SetScreenshareVisibility)
                .ok_or_else(|| MethodCallError::invalid("Visible boolean required")),
            other => Err(MethodCallError::NotImplemented(other.to_string())),
        }
    }
}

fn number_arg(arguments: &Map<String, Value>, key: &str) -> Option<f64> {
    arguments.get(key).and_then(Value::as_f64)
}
