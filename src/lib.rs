//! Austrian motor vehicle insurance tax (motorbezogene Versicherungssteuer).
//!
//! The [`tax`] module holds the tariff engine: a pure mapping from a validated
//! [`tax::VehicleProfile`] to a monthly amount. [`cmd`] contains the command
//! line front ends that collect the vehicle data and render the result.

pub mod cmd;
pub mod tax;
pub mod utils;
