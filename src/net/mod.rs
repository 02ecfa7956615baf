//! HTTP transport and wire formats.

pub mod client;
pub mod wire;

pub use client::ApiClient;
pub use wire::{ArenaResponse, MoveRequest, MoveResponse, UnitCommand};
