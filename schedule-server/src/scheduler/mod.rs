//! Boundary to the external route store and scheduler.
//!
//! The scheduling algorithm itself is opaque: it runs behind
//! `GET /api/bus-routes/{id}/schedule` and returns a nested
//! shift → bus → events document. This module fetches that document
//! together with the route metadata, decodes it leniently, and converts
//! it to domain types for the views.

mod backend;
mod client;
mod convert;
mod error;
pub mod lenient;
mod mock;
mod route;
mod types;

pub use backend::ScheduleBackend;
pub use client::{DEFAULT_BASE_URL, SchedulerClient, SchedulerConfig};
pub use convert::{ConversionError, convert_schedule, parse_schedule, schedule_from_value};
pub use error::SchedulerError;
pub use mock::MockSchedulerClient;
pub use route::{RouteInfo, RouteSchedule};
pub use types::{RawEvent, RawLeg, SchedulePayload};
