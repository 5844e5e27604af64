use super::{buffer};

mod label;
pub use label::{Patch, Label};

pub mod x86_64;
