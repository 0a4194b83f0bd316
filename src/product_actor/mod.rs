mod actions;
mod entity;

pub use actions::{ProductAction, ProductActionResult};
