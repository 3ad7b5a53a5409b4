//! `vehicle-profile-client` library crate.
//!
//! Resolves named vehicle attributes from a remote vehicle-profile service:
//! attributes are declared as `(name, JSONPath, type)` descriptors, the profile
//! is fetched once per batch, and every descriptor is evaluated against it.
//! Also covers user/vehicle association and partner qualification.
//!
//! The binary (`vpc`) is a thin wrapper around this library.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod partner;
pub mod registry;
pub mod report;
pub mod transport;

pub use client::VehicleProfileClient;
pub use config::ClientConfig;
pub use domain::{AttributeDescriptor, AttributeValue, ErrorPolicy, ResolvedAttributes, ValueKind};
pub use error::{ErrorKind, ProfileError, ProfileResult};
pub use registry::VehicleAttribute;
