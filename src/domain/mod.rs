//! Domain layer: signup rules independent of storage.

pub mod rules;

pub use rules::{first_duplicate, has_room};
