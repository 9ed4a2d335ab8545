// src/application/mod.rs
pub mod dto;
pub mod state;
pub mod usecase;
