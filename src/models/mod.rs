pub mod common;
pub mod gemini;
pub mod palette;
pub mod request;

pub use common::*;
pub use palette::*;
pub use request::*;
