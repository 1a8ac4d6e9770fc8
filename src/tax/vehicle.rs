use super::tariff::TariffEpoch;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("invalid vehicle class '{0}' (expected L or M1)")]
    InvalidVehicleClass(String),
    #[error("invalid drive type '{0}' (expected electric or combustion)")]
    InvalidDriveType(String),
    #[error("missing required field: {field}")]
    MissingRequiredField { field: &'static str },
    #[error("negative value for {field}: {value}")]
    NegativeInput { field: &'static str, value: Decimal },
    #[error("value for {field} out of range: {value} (maximum {max})", max = MAX_MEASUREMENT)]
    OutOfRange { field: &'static str, value: Decimal },
}

/// Largest accepted measurement. Keeps every tariff product well inside
/// the `Decimal` range.
pub const MAX_MEASUREMENT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Reject negative and implausibly large measurements
pub fn check_measurement(field: &'static str, value: Decimal) -> Result<(), ProfileError> {
    if value < Decimal::ZERO {
        Err(ProfileError::NegativeInput { field, value })
    } else if value > MAX_MEASUREMENT {
        Err(ProfileError::OutOfRange { field, value })
    } else {
        Ok(())
    }
}

/// Vehicle class as defined by the EU type approval categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleClass {
    /// Motorcycles and similar light vehicles (L1e to L5e)
    L,
    /// Passenger cars up to 3.5 tonnes
    M1,
}

impl VehicleClass {
    pub fn display(&self) -> &'static str {
        match self {
            VehicleClass::L => "L",
            VehicleClass::M1 => "M1",
        }
    }
}

impl FromStr for VehicleClass {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "l" => Ok(VehicleClass::L),
            "m1" => Ok(VehicleClass::M1),
            _ => Err(ProfileError::InvalidVehicleClass(s.to_string())),
        }
    }
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriveType {
    Electric,
    /// Combustion engines and every other non-electric drive
    Combustion,
}

impl DriveType {
    pub fn display(&self) -> &'static str {
        match self {
            DriveType::Electric => "Electric",
            DriveType::Combustion => "Combustion",
        }
    }
}

impl FromStr for DriveType {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "electric" => Ok(DriveType::Electric),
            "combustion" | "other" => Ok(DriveType::Combustion),
            _ => Err(ProfileError::InvalidDriveType(s.to_string())),
        }
    }
}

impl std::fmt::Display for DriveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// The measurements the tariff needs, one variant per (class, drive type) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vehicle {
    LElectric {
        power_kw: Decimal,
    },
    LCombustion {
        displacement_cc: Decimal,
        /// Only present (and only used) for registrations on or after the cutover
        co2_g_per_km: Option<Decimal>,
    },
    M1Electric {
        power_kw: Decimal,
        weight_kg: Decimal,
    },
    M1Combustion {
        power_kw: Decimal,
    },
}

impl Vehicle {
    pub fn class(&self) -> VehicleClass {
        match self {
            Vehicle::LElectric { .. } | Vehicle::LCombustion { .. } => VehicleClass::L,
            Vehicle::M1Electric { .. } | Vehicle::M1Combustion { .. } => VehicleClass::M1,
        }
    }

    pub fn drive_type(&self) -> DriveType {
        match self {
            Vehicle::LElectric { .. } | Vehicle::M1Electric { .. } => DriveType::Electric,
            Vehicle::LCombustion { .. } | Vehicle::M1Combustion { .. } => DriveType::Combustion,
        }
    }

    /// Named measurements carried by this variant, in display order
    pub fn measurements(&self) -> Vec<(&'static str, Decimal)> {
        match self {
            Vehicle::LElectric { power_kw } | Vehicle::M1Combustion { power_kw } => {
                vec![("power_kw", *power_kw)]
            }
            Vehicle::LCombustion {
                displacement_cc,
                co2_g_per_km,
            } => {
                let mut values = vec![("displacement_cc", *displacement_cc)];
                if let Some(co2) = co2_g_per_km {
                    values.push(("co2_g_per_km", *co2));
                }
                values
            }
            Vehicle::M1Electric {
                power_kw,
                weight_kg,
            } => vec![("power_kw", *power_kw), ("weight_kg", *weight_kg)],
        }
    }
}

/// A vehicle together with its first registration date.
///
/// Only constructed through [`VehicleProfile::new`], so every profile carries
/// measurements within `0..=MAX_MEASUREMENT` and the emissions figure whenever the tariff
/// for its epoch needs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleProfile {
    registered: NaiveDate,
    vehicle: Vehicle,
}

impl VehicleProfile {
    pub fn new(registered: NaiveDate, vehicle: Vehicle) -> Result<Self, ProfileError> {
        for (field, value) in vehicle.measurements() {
            check_measurement(field, value)?;
        }

        let vehicle = match vehicle {
            Vehicle::LCombustion {
                displacement_cc,
                co2_g_per_km,
            } => match TariffEpoch::from_date(registered) {
                TariffEpoch::Post2020 if co2_g_per_km.is_none() => {
                    return Err(ProfileError::MissingRequiredField {
                        field: "co2_g_per_km",
                    })
                }
                TariffEpoch::Post2020 => Vehicle::LCombustion {
                    displacement_cc,
                    co2_g_per_km,
                },
                TariffEpoch::Pre2020 => {
                    if co2_g_per_km.is_some() {
                        log::debug!("Ignoring CO2 emissions for registration before the cutover");
                    }
                    Vehicle::LCombustion {
                        displacement_cc,
                        co2_g_per_km: None,
                    }
                }
            },
            other => other,
        };

        Ok(VehicleProfile {
            registered,
            vehicle,
        })
    }

    pub fn registered(&self) -> NaiveDate {
        self.registered
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn epoch(&self) -> TariffEpoch {
        TariffEpoch::from_date(self.registered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn vehicle_class_from_str() {
        assert_eq!("L".parse::<VehicleClass>(), Ok(VehicleClass::L));
        assert_eq!("m1".parse::<VehicleClass>(), Ok(VehicleClass::M1));
        assert_eq!(" M1 ".parse::<VehicleClass>(), Ok(VehicleClass::M1));
        assert_eq!(
            "N1".parse::<VehicleClass>(),
            Err(ProfileError::InvalidVehicleClass("N1".to_string()))
        );
    }

    #[test]
    fn drive_type_from_str() {
        assert_eq!("Electric".parse::<DriveType>(), Ok(DriveType::Electric));
        assert_eq!("combustion".parse::<DriveType>(), Ok(DriveType::Combustion));
        assert_eq!("other".parse::<DriveType>(), Ok(DriveType::Combustion));
        assert_eq!(
            "steam".parse::<DriveType>(),
            Err(ProfileError::InvalidDriveType("steam".to_string()))
        );
    }

    #[test]
    fn class_and_drive_type_from_variant() {
        let v = Vehicle::M1Electric {
            power_kw: dec!(50),
            weight_kg: dec!(1500),
        };
        assert_eq!(v.class(), VehicleClass::M1);
        assert_eq!(v.drive_type(), DriveType::Electric);

        let v = Vehicle::LCombustion {
            displacement_cc: dec!(125),
            co2_g_per_km: None,
        };
        assert_eq!(v.class(), VehicleClass::L);
        assert_eq!(v.drive_type(), DriveType::Combustion);
    }

    #[test]
    fn negative_measurement_rejected() {
        let err = VehicleProfile::new(
            date("2021-01-01"),
            Vehicle::M1Electric {
                power_kw: dec!(50),
                weight_kg: dec!(-1),
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            ProfileError::NegativeInput {
                field: "weight_kg",
                value: dec!(-1)
            }
        );
    }

    #[test]
    fn huge_measurement_rejected() {
        let err = VehicleProfile::new(
            date("2021-01-01"),
            Vehicle::M1Combustion {
                power_kw: Decimal::MAX,
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            ProfileError::OutOfRange {
                field: "power_kw",
                value: Decimal::MAX
            }
        );
    }

    #[test]
    fn maximum_measurement_accepted() {
        let profile = VehicleProfile::new(
            date("2021-01-01"),
            Vehicle::M1Electric {
                power_kw: MAX_MEASUREMENT,
                weight_kg: MAX_MEASUREMENT,
            },
        );
        assert!(profile.is_ok());
        assert_eq!(MAX_MEASUREMENT, dec!(1000000000));
    }

    #[test]
    fn zero_measurement_accepted() {
        let profile =
            VehicleProfile::new(date("2021-01-01"), Vehicle::M1Combustion { power_kw: dec!(0) });
        assert!(profile.is_ok());
    }

    #[test]
    fn co2_required_after_cutover() {
        let err = VehicleProfile::new(
            date("2020-10-01"),
            Vehicle::LCombustion {
                displacement_cc: dec!(500),
                co2_g_per_km: None,
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            ProfileError::MissingRequiredField {
                field: "co2_g_per_km"
            }
        );
    }

    #[test]
    fn co2_dropped_before_cutover() {
        let profile = VehicleProfile::new(
            date("2020-09-30"),
            Vehicle::LCombustion {
                displacement_cc: dec!(500),
                co2_g_per_km: Some(dec!(90)),
            },
        )
        .unwrap();
        assert_eq!(
            profile.vehicle(),
            &Vehicle::LCombustion {
                displacement_cc: dec!(500),
                co2_g_per_km: None
            }
        );
        assert_eq!(profile.epoch(), TariffEpoch::Pre2020);
    }
}
