// src/handlers/mod.rs
pub mod chat;
pub mod export;
pub mod ui;
