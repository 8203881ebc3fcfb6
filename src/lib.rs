//! Actor simulation core for a top-down arcade shooter.
//!
//! `domain` holds the pure rules (geometry, flags, status timers, animation,
//! damage and pickup tables); `sim` owns the mutable world and the per-tick
//! step that drives it. Rendering, sound playback and input live with the host.

pub mod config;
pub mod domain;
pub mod sim;
