pub use common::*;
pub use event_bridge::*;
pub use traits::*;

mod common;
mod event_bridge;
pub mod headless;
mod traits;
