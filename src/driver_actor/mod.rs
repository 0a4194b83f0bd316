mod actions;
mod entity;

pub use actions::{DriverAction, DriverActionResult};
