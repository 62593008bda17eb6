//! Read-side filters over an in-memory task snapshot.

pub mod tasks;

pub use tasks::*;
