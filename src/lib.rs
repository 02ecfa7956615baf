//! Blazebot - Autonomous Arena Controller
//!
//! Polls a grid-arena game server, runs a per-unit priority decision
//! engine over each snapshot, and submits movement and bomb-placement
//! commands on a rate-limited cadence until shut down.

pub mod core;
pub mod danger;
pub mod engine;
pub mod nav;
pub mod net;
pub mod runner;
pub mod state;
