use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::backtrace::Backtrace;
use std::fmt::{Display as FmtDisplay, Formatter};

#[derive(Debug)]
pub struct PlatformError {
    pub error_type: PlatformErrorType,
    pub backtrace: Backtrace,
}

#[derive(Debug)]
pub enum PlatformErrorType {
    /// The window has no content view to host an overlay.
    NoContentView,
    Error(String),
}

impl From<PlatformErrorType> for PlatformError {
    fn from(error_type: PlatformErrorType) -> Self {
        Self {
            error_type,
            backtrace: Backtrace::capture(),
        }
    }
}

impl From<&str> for PlatformError {
    fn from(error: &str) -> Self {
        PlatformErrorType::Error(error.to_string()).into()
    }
}

impl FmtDisplay for PlatformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.error_type {
            PlatformErrorType::NoContentView => write!(f, "window has no content view"),
            PlatformErrorType::Error(message) => write!(f, "{message}"),
        }
    }
}

pub type PlatformResult<T> = Result<T, PlatformError>;

/// Events pushed from the controller to the host, unsolicited.
#[derive(Debug, Clone, PartialEq)]
pub enum NotchEvent {
    /// The pointer entered (`true`) or left (`false`) the trigger zone.
    HoverZone(bool),
}

impl NotchEvent {
    /// The host-side method name the event is delivered as.
    pub fn method(&self) -> &'static str {
        match self {
            NotchEvent::HoverZone(_) => "onHoverZone",
        }
    }

    pub fn arguments(&self) -> Value {
        match self {
            NotchEvent::HoverZone(inside) => Value::Bool(*inside),
        }
    }
}

pub type DisplayId = u32;

/// A rectangle in screen space. Origin at the bottom-left of the primary display, with y
/// growing upward as on macOS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Bounds {
    pub position: Position,
    pub size: Size,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            position: Position::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// A rectangle at the origin with the given size, as used for view-local frames.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn min_x(&self) -> f64 {
        self.position.x
    }

    pub fn max_x(&self) -> f64 {
        self.position.x + self.size.width
    }

    pub fn min_y(&self) -> f64 {
        self.position.y
    }

    pub fn max_y(&self) -> f64 {
        self.position.y + self.size.height
    }

    pub fn mid_x(&self) -> f64 {
        self.position.x + self.size.width / 2.0
    }

    /// True when the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        !(self.size.width > 0.0 && self.size.height > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct Display {
    pub id: DisplayId,
    pub name: String,
    pub bounds: Bounds,
}
