pub mod engine;
pub mod input;
pub mod tariff;
pub mod vehicle;

pub use engine::{calculate_tax, compute_monthly_tax, TaxComponent, TaxResult};
pub use input::{read_profile_json, ProfileInput, SchemaField};
pub use tariff::{progressive, Adjustment, Band, Schedule, TariffEpoch};
pub use vehicle::{DriveType, ProfileError, Vehicle, VehicleClass, VehicleProfile};
