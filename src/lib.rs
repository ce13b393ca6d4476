//! A small Rust client for the GB National Grid Carbon Intensity API
//! (<https://api.carbonintensity.org.uk>).
//!
//! The API reports forecast and actual carbon intensity (gCO2/kWh) for each
//! half-hour settlement period, the emission factor of every fuel type, and
//! intensity statistics over date ranges. Each [`Client`] method validates its
//! arguments, performs one blocking GET and decodes the JSON reply into typed
//! records.
//!
//! ## Quick start
//! - [`Client::new`] talks to the production API.
//! - [`Client::from_env`] honours `CARBONINTENSITY_URL` / `CARBONINTENSITY_TIMEOUT`
//!   or a `.carbonintensityrc` file (current directory, then home directory).
//! - [`Client::with_transport`] accepts any [`Transport`], e.g. a test double.
//!
//! ```no_run
//! use carbonintensity::Client;
//! use chrono::{Duration, Utc};
//!
//! fn main() -> carbonintensity::Result<()> {
//!     let client = Client::new()?;
//!
//!     let now = client.current_intensity()?;
//!     println!("{now}");
//!
//!     let week = client.statistics_in_blocks(
//!         Utc::now() - Duration::days(7),
//!         Utc::now(),
//!         std::time::Duration::from_secs(4 * 3600),
//!     )?;
//!     for block in week {
//!         println!("{block}");
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod client;
mod config;
mod error;
mod model;
mod request;
mod response;
mod transport;
mod util;

pub use client::{Client, ClientConfig, DEFAULT_URL};
pub use error::{ApiError, Error, ParameterError, Result, TransportError};
pub use model::{FuelType, Intensity, IntensityFactors, IntensityIndex, NOT_AVAILABLE, Statistics};
pub use transport::{HttpTransport, Reply, Transport};
