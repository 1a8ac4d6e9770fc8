use super::tariff::{Schedule, TariffEpoch};
use super::vehicle::{Vehicle, VehicleProfile};
use rust_decimal::Decimal;

/// Outcome of a tax calculation for a single vehicle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxResult {
    /// Monthly tax, rounded to 2 decimal places
    pub monthly: Decimal,
    /// Twelve times the rounded monthly tax
    pub annual: Decimal,
    pub epoch: TariffEpoch,
    /// How the monthly amount was built up, in charging order
    pub components: Vec<TaxComponent>,
    /// Minimum charge that replaced the computed amount, if any
    pub minimum_applied: Option<Decimal>,
}

/// A single charged measurement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxComponent {
    pub name: &'static str,
    pub raw: Decimal,
    pub adjusted: Decimal,
    /// Unrounded charge for this part
    pub amount: Decimal,
}

impl TaxComponent {
    fn charge(name: &'static str, schedule: &Schedule, raw: Decimal) -> Self {
        let adjusted = schedule.adjustment.apply(raw);
        let amount = schedule.charge(raw);
        log::debug!(
            "{}: raw={}, adjusted={}, amount={}",
            name,
            raw,
            adjusted,
            amount
        );
        TaxComponent {
            name,
            raw,
            adjusted,
            amount,
        }
    }
}

/// Calculate the motor vehicle insurance tax for a validated profile
pub fn calculate_tax(profile: &VehicleProfile) -> TaxResult {
    let epoch = profile.epoch();
    log::debug!(
        "Calculating {} {} registered {} ({})",
        profile.vehicle().class(),
        profile.vehicle().drive_type(),
        profile.registered(),
        epoch
    );

    let mut minimum = None;
    let components = match *profile.vehicle() {
        Vehicle::LElectric { power_kw } => {
            vec![TaxComponent::charge(
                "power",
                &epoch.l_electric_power(),
                power_kw,
            )]
        }
        Vehicle::LCombustion {
            displacement_cc,
            co2_g_per_km,
        } => {
            let mut parts = vec![TaxComponent::charge(
                "displacement",
                &epoch.l_combustion_displacement(),
                displacement_cc,
            )];
            // profile construction guarantees the CO2 figure after the cutover
            if let (Some(schedule), Some(co2)) = (epoch.l_combustion_co2(), co2_g_per_km) {
                parts.push(TaxComponent::charge("co2", &schedule, co2));
            }
            parts
        }
        Vehicle::M1Electric {
            power_kw,
            weight_kg,
        } => vec![
            TaxComponent::charge("power", &epoch.m1_electric_power(), power_kw),
            TaxComponent::charge("weight", &epoch.m1_electric_weight(), weight_kg),
        ],
        Vehicle::M1Combustion { power_kw } => {
            let schedule = epoch.m1_combustion_power();
            minimum = schedule.minimum;
            vec![TaxComponent::charge("power", &schedule, power_kw)]
        }
    };

    let total: Decimal = components.iter().map(|c| c.amount).sum();
    let minimum_applied = minimum.filter(|min| total < *min);
    if let Some(min) = minimum_applied {
        log::debug!("Computed {} below minimum, charging {}", total, min);
    }

    let monthly = total.max(minimum.unwrap_or(Decimal::ZERO)).round_dp(2);
    let annual = monthly * Decimal::from(12);

    TaxResult {
        monthly,
        annual,
        epoch,
        components,
        minimum_applied,
    }
}

/// Monthly tax only, rounded to 2 decimal places
pub fn compute_monthly_tax(profile: &VehicleProfile) -> Decimal {
    calculate_tax(profile).monthly
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn profile(registered: &str, vehicle: Vehicle) -> VehicleProfile {
        VehicleProfile::new(date(registered), vehicle).unwrap()
    }

    fn l_electric(power_kw: Decimal) -> VehicleProfile {
        profile("2021-01-01", Vehicle::LElectric { power_kw })
    }

    fn l_combustion(
        registered: &str,
        displacement_cc: Decimal,
        co2: Option<Decimal>,
    ) -> VehicleProfile {
        profile(
            registered,
            Vehicle::LCombustion {
                displacement_cc,
                co2_g_per_km: co2,
            },
        )
    }

    fn m1_electric(power_kw: Decimal, weight_kg: Decimal) -> VehicleProfile {
        profile(
            "2021-01-01",
            Vehicle::M1Electric {
                power_kw,
                weight_kg,
            },
        )
    }

    fn m1_combustion(registered: &str, power_kw: Decimal) -> VehicleProfile {
        profile(registered, Vehicle::M1Combustion { power_kw })
    }

    #[test]
    fn m1_electric_example() {
        let result = calculate_tax(&m1_electric(dec!(50), dec!(1500)));
        // power: adjusted 10 (floor) -> 2.50; weight: adjusted 600 -> 7.5 + 3
        assert_eq!(result.components[0].adjusted, dec!(10));
        assert_eq!(result.components[0].amount, dec!(2.50));
        assert_eq!(result.components[1].adjusted, dec!(600));
        assert_eq!(result.components[1].amount, dec!(10.5));
        assert_eq!(result.monthly, dec!(13.00));
        assert_eq!(result.annual, dec!(156.00));
    }

    #[test]
    fn m1_electric_power_above_floor() {
        // power 95 -> adjusted 50: 35 * 0.25 + 15 * 0.35 = 14.00
        // weight 1100 -> adjusted 200 (floor): 200 * 0.015 = 3.00
        let result = calculate_tax(&m1_electric(dec!(95), dec!(1100)));
        assert_eq!(result.monthly, dec!(17.00));
    }

    #[test]
    fn m1_electric_weight_open_band() {
        // power 45 -> adjusted 10 -> 2.50
        // weight 2300 -> adjusted 1400: 7.5 + 21 + 200 * 0.045 = 37.5
        let result = calculate_tax(&m1_electric(dec!(45), dec!(2300)));
        assert_eq!(result.monthly, dec!(40.00));
    }

    #[test]
    fn m1_combustion_before_cutover() {
        let result = calculate_tax(&m1_combustion("2019-01-01", dec!(100)));
        // adjusted 76: 66 * 0.62 + 10 * 0.66
        assert_eq!(result.monthly, dec!(47.52));
        assert_eq!(result.annual, dec!(570.24));
        assert_eq!(result.epoch, TariffEpoch::Pre2020);
        assert_eq!(result.minimum_applied, None);
    }

    #[test]
    fn m1_combustion_after_cutover_top_band() {
        let result = calculate_tax(&m1_combustion("2021-01-01", dec!(150)));
        // adjusted 126: 66 * 0.65 + 20 * 0.70 + 40 * 0.79 = 42.9 + 14 + 31.6
        assert_eq!(result.monthly, dec!(88.50));
    }

    #[test]
    fn m1_combustion_minimum_after_cutover() {
        let result = calculate_tax(&m1_combustion("2021-01-01", dec!(10)));
        assert_eq!(result.components[0].amount, dec!(0));
        assert_eq!(result.monthly, dec!(6.50));
        assert_eq!(result.minimum_applied, Some(dec!(6.50)));
    }

    #[test]
    fn m1_combustion_minimum_with_zero_power() {
        assert_eq!(compute_monthly_tax(&m1_combustion("2019-01-01", dec!(0))), dec!(6.20));
        assert_eq!(compute_monthly_tax(&m1_combustion("2021-01-01", dec!(0))), dec!(6.50));
    }

    #[test]
    fn m1_combustion_minimum_never_undercut() {
        let mut power = dec!(0);
        while power <= dec!(300) {
            assert!(compute_monthly_tax(&m1_combustion("2019-01-01", power)) >= dec!(6.20));
            assert!(compute_monthly_tax(&m1_combustion("2021-01-01", power)) >= dec!(6.50));
            power += dec!(2.5);
        }
    }

    #[test]
    fn l_electric_example() {
        assert_eq!(compute_monthly_tax(&l_electric(dec!(20))), dec!(7.50));
    }

    #[test]
    fn l_electric_floor() {
        // adjusted power never below 4
        assert_eq!(compute_monthly_tax(&l_electric(dec!(3))), dec!(2.00));
    }

    #[test]
    fn l_combustion_before_cutover() {
        let result = calculate_tax(&l_combustion("2019-06-01", dec!(500), None));
        assert_eq!(result.monthly, dec!(12.50));
        assert_eq!(result.components.len(), 1);
    }

    #[test]
    fn l_combustion_after_cutover() {
        let result = calculate_tax(&l_combustion("2021-01-01", dec!(500), Some(dec!(90))));
        // 0.014 * 448 + 0.20 * 38 = 6.272 + 7.6
        assert_eq!(result.components[0].adjusted, dec!(448));
        assert_eq!(result.components[1].adjusted, dec!(38));
        assert_eq!(result.monthly, dec!(13.87));
    }

    #[test]
    fn l_combustion_low_emissions_floor() {
        // co2 40 -> adjusted 10 (floor): 0.014 * 48 + 0.20 * 10 = 0.672 + 2
        let result = calculate_tax(&l_combustion("2022-05-01", dec!(100), Some(dec!(40))));
        assert_eq!(result.monthly, dec!(2.67));
    }

    #[test]
    fn epoch_boundary_selects_formula() {
        let on = calculate_tax(&m1_combustion("2020-10-01", dec!(100)));
        let before = calculate_tax(&m1_combustion("2020-09-30", dec!(100)));
        assert_eq!(on.epoch, TariffEpoch::Post2020);
        assert_eq!(before.epoch, TariffEpoch::Pre2020);
        // 66 * 0.65 + 10 * 0.70
        assert_eq!(on.monthly, dec!(49.90));
        assert_eq!(before.monthly, dec!(47.52));
    }

    #[test]
    fn rounds_half_to_even() {
        // 0.025 * 101 = 2.525 -> 2.52
        assert_eq!(
            compute_monthly_tax(&l_combustion("2019-06-01", dec!(101), None)),
            dec!(2.52)
        );
        // 0.025 * 103 = 2.575 -> 2.58
        assert_eq!(
            compute_monthly_tax(&l_combustion("2019-06-01", dec!(103), None)),
            dec!(2.58)
        );
    }

    #[test]
    fn largest_measurements_do_not_overflow() {
        use crate::tax::vehicle::MAX_MEASUREMENT;

        let profiles = vec![
            l_electric(MAX_MEASUREMENT),
            l_combustion("2021-01-01", MAX_MEASUREMENT, Some(MAX_MEASUREMENT)),
            m1_electric(MAX_MEASUREMENT, MAX_MEASUREMENT),
            m1_combustion("2021-01-01", MAX_MEASUREMENT),
        ];
        for profile in profiles {
            let result = calculate_tax(&profile);
            assert!(result.monthly > Decimal::ZERO);
            assert_eq!(result.annual, result.monthly * dec!(12));
        }
        // (1e9 - 24 - 86) * 0.79 + 66 * 0.65 + 20 * 0.70
        assert_eq!(
            compute_monthly_tax(&m1_combustion("2021-01-01", MAX_MEASUREMENT)),
            dec!(789999970.00)
        );
    }

    #[test]
    fn annual_is_twelve_rounded_months() {
        let profiles = vec![
            l_electric(dec!(11.3)),
            l_combustion("2021-01-01", dec!(123.4), Some(dec!(77.7))),
            m1_electric(dec!(133.3), dec!(2111.1)),
            m1_combustion("2019-01-01", dec!(97.7)),
        ];
        for profile in profiles {
            let result = calculate_tax(&profile);
            assert_eq!(result.monthly, result.monthly.round_dp(2));
            assert_eq!(result.annual, result.monthly * dec!(12));
        }
    }

    #[test]
    fn monotonic_in_power() {
        let mut previous = [Decimal::ZERO; 4];
        let mut power = dec!(0);
        while power <= dec!(400) {
            let current = [
                compute_monthly_tax(&l_electric(power)),
                compute_monthly_tax(&m1_electric(power, dec!(1500))),
                compute_monthly_tax(&m1_combustion("2019-01-01", power)),
                compute_monthly_tax(&m1_combustion("2021-01-01", power)),
            ];
            for (cur, prev) in current.iter().zip(previous.iter()) {
                assert!(cur >= prev, "power {} decreased tax", power);
            }
            previous = current;
            power += dec!(0.5);
        }
    }

    #[test]
    fn monotonic_in_weight() {
        let mut previous = Decimal::ZERO;
        let mut weight = dec!(0);
        while weight <= dec!(3500) {
            let current = compute_monthly_tax(&m1_electric(dec!(80), weight));
            assert!(current >= previous, "weight {} decreased tax", weight);
            previous = current;
            weight += dec!(10);
        }
    }

    #[test]
    fn monotonic_in_displacement_and_co2() {
        let mut previous = [Decimal::ZERO; 3];
        let mut step = dec!(0);
        while step <= dec!(1500) {
            let current = [
                compute_monthly_tax(&l_combustion("2019-01-01", step, None)),
                compute_monthly_tax(&l_combustion("2021-01-01", step, Some(dec!(90)))),
                compute_monthly_tax(&l_combustion("2021-01-01", dec!(500), Some(step / dec!(5)))),
            ];
            for (cur, prev) in current.iter().zip(previous.iter()) {
                assert!(cur >= prev, "step {} decreased tax", step);
            }
            previous = current;
            step += dec!(5);
        }
    }
}
