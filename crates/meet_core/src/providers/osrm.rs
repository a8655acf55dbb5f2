//! OSRM `/table` travel times.
//!
//! One request per origin: the origin is source 0 and every venue is a
//! destination. OSRM has no public-transport profile, so TRANSIT batches fail
//! with [`TravelTimeError::Unsupported`](crate::error::TravelTimeError).

mod client;
mod error;
mod parser;
mod response;


pub use client::OsrmTravelTimes;
pub use error::OsrmError;
