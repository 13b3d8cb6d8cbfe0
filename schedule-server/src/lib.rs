//! Duty schedule presentation server.
//!
//! Takes the per-shift, per-bus duty schedule generated for a bus route and
//! derives the three views the depot prints: an event-by-duty grid, a
//! duty board split at crew breaks, and a public timetable per direction.

pub mod cache;
pub mod config;
pub mod domain;
pub mod scheduler;
pub mod views;
pub mod web;
