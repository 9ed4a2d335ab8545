// src/adapter/mod.rs
pub mod shell;

pub use shell::{OrderingShell, Screen};
