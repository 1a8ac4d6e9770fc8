use super::tariff::TariffEpoch;
use super::vehicle::{
    check_measurement, DriveType, ProfileError, Vehicle, VehicleClass, VehicleProfile,
};
use chrono::NaiveDate;
use mitax_derive::FieldSchema;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Deserialize;
use std::io::Read;

/// Description of one input field, generated by `#[derive(FieldSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub required: bool,
    pub unit: Option<&'static str>,
    pub description: &'static str,
}

/// Flat vehicle record as collected by a form or prompt.
///
/// Which measurements are needed depends on class, drive type and the
/// registration date; the rest may be omitted and are ignored when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema, FieldSchema)]
pub struct ProfileInput {
    /// Vehicle class: L (motorcycles) or M1 (passenger cars up to 3.5t)
    pub vehicle_class: String,
    /// Drive type: electric or combustion
    pub drive_type: String,
    /// First registration date (YYYY-MM-DD)
    #[schemars(with = "String")]
    pub registration_date: NaiveDate,
    /// Engine or electric motor power (electric vehicles and M1 combustion)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    #[field(unit = "kW")]
    pub power_kw: Option<Decimal>,
    /// Vehicle weight (M1 electric)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    #[field(unit = "kg")]
    pub weight_kg: Option<Decimal>,
    /// Engine displacement (L combustion)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    #[field(unit = "cc")]
    pub displacement_cc: Option<Decimal>,
    /// CO2 emissions (L combustion registered from 2020-10-01)
    #[serde(default, rename = "co2_g_per_km")]
    #[schemars(with = "Option<f64>")]
    #[field(unit = "g/km")]
    pub co2_emissions: Option<Decimal>,
}

impl ProfileInput {
    /// Record for a class and drive type with no measurements yet
    pub fn new(class: VehicleClass, drive: DriveType, registered: NaiveDate) -> Self {
        ProfileInput {
            vehicle_class: class.to_string(),
            drive_type: drive.to_string(),
            registration_date: registered,
            ..Default::default()
        }
    }

    /// Fields the tariff needs for a class, drive type and registration date
    pub fn required_fields(
        class: VehicleClass,
        drive: DriveType,
        registered: NaiveDate,
    ) -> &'static [&'static str] {
        match (class, drive) {
            (VehicleClass::L, DriveType::Electric) => &["power_kw"],
            (VehicleClass::L, DriveType::Combustion) => match TariffEpoch::from_date(registered) {
                TariffEpoch::Pre2020 => &["displacement_cc"],
                TariffEpoch::Post2020 => &["displacement_cc", "co2_g_per_km"],
            },
            (VehicleClass::M1, DriveType::Electric) => &["power_kw", "weight_kg"],
            (VehicleClass::M1, DriveType::Combustion) => &["power_kw"],
        }
    }

    /// Validate the record and build the typed profile for the tariff engine
    pub fn into_profile(self) -> Result<VehicleProfile, ProfileError> {
        let class: VehicleClass = self.vehicle_class.parse()?;
        let drive: DriveType = self.drive_type.parse()?;

        // range is checked even for fields the tariff will ignore
        for (field, value) in self.supplied() {
            check_measurement(field, value)?;
        }

        let required = Self::required_fields(class, drive, self.registration_date);
        for (field, _) in self.supplied() {
            if !required.contains(&field) {
                log::debug!("Ignoring {} for {} {} vehicle", field, class, drive);
            }
        }

        let vehicle = match (class, drive) {
            (VehicleClass::L, DriveType::Electric) => Vehicle::LElectric {
                power_kw: require("power_kw", self.power_kw)?,
            },
            (VehicleClass::L, DriveType::Combustion) => Vehicle::LCombustion {
                displacement_cc: require("displacement_cc", self.displacement_cc)?,
                co2_g_per_km: self.co2_emissions,
            },
            (VehicleClass::M1, DriveType::Electric) => Vehicle::M1Electric {
                power_kw: require("power_kw", self.power_kw)?,
                weight_kg: require("weight_kg", self.weight_kg)?,
            },
            (VehicleClass::M1, DriveType::Combustion) => Vehicle::M1Combustion {
                power_kw: require("power_kw", self.power_kw)?,
            },
        };

        VehicleProfile::new(self.registration_date, vehicle)
    }

    fn supplied(&self) -> Vec<(&'static str, Decimal)> {
        [
            ("power_kw", self.power_kw),
            ("weight_kg", self.weight_kg),
            ("displacement_cc", self.displacement_cc),
            ("co2_g_per_km", self.co2_emissions),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

fn require(field: &'static str, value: Option<Decimal>) -> Result<Decimal, ProfileError> {
    value.ok_or(ProfileError::MissingRequiredField { field })
}

/// Read a single profile record from JSON
pub fn read_profile_json<R: Read>(reader: R) -> anyhow::Result<ProfileInput> {
    let input: ProfileInput = serde_json::from_reader(reader)?;
    Ok(input)
}
