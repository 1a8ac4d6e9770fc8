use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Statutory cutover: registrations on or after this date use the new tariff
pub fn cutover_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 10, 1).expect("valid cutover date")
}

/// Tariff period a vehicle falls into, decided by its first registration date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TariffEpoch {
    /// Registered before 1 October 2020
    Pre2020,
    /// Registered on or after 1 October 2020
    Post2020,
}

impl TariffEpoch {
    pub fn from_date(date: NaiveDate) -> Self {
        if date >= cutover_date() {
            TariffEpoch::Post2020
        } else {
            TariffEpoch::Pre2020
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            TariffEpoch::Pre2020 => "before 2020-10-01",
            TariffEpoch::Post2020 => "from 2020-10-01",
        }
    }

    /// L-class electric: charged per kW of adjusted power
    pub fn l_electric_power(&self) -> Schedule {
        Schedule {
            adjustment: Adjustment::new(dec!(5), dec!(4)),
            bands: vec![Band::above(dec!(0.50))],
            minimum: None,
        }
    }

    /// L-class combustion: charged per cc of displacement
    pub fn l_combustion_displacement(&self) -> Schedule {
        match self {
            TariffEpoch::Pre2020 => Schedule {
                adjustment: Adjustment::none(),
                bands: vec![Band::above(dec!(0.025))],
                minimum: None,
            },
            TariffEpoch::Post2020 => Schedule {
                adjustment: Adjustment::new(dec!(52), dec!(0)),
                bands: vec![Band::above(dec!(0.014))],
                minimum: None,
            },
        }
    }

    /// L-class combustion CO2 part, only levied from the cutover onwards
    pub fn l_combustion_co2(&self) -> Option<Schedule> {
        match self {
            TariffEpoch::Pre2020 => None,
            TariffEpoch::Post2020 => Some(Schedule {
                adjustment: Adjustment::new(dec!(52), dec!(10)),
                bands: vec![Band::above(dec!(0.20))],
                minimum: None,
            }),
        }
    }

    /// M1-class electric power part (same in both epochs)
    pub fn m1_electric_power(&self) -> Schedule {
        Schedule {
            adjustment: Adjustment::new(dec!(45), dec!(10)),
            bands: vec![
                Band::upto(dec!(35), dec!(0.25)),
                Band::upto(dec!(60), dec!(0.35)),
                Band::above(dec!(0.45)),
            ],
            minimum: None,
        }
    }

    /// M1-class electric weight part (same in both epochs)
    pub fn m1_electric_weight(&self) -> Schedule {
        Schedule {
            adjustment: Adjustment::new(dec!(900), dec!(200)),
            bands: vec![
                Band::upto(dec!(500), dec!(0.015)),
                Band::upto(dec!(1200), dec!(0.030)),
                Band::above(dec!(0.045)),
            ],
            minimum: None,
        }
    }

    /// M1-class combustion power tariff
    pub fn m1_combustion_power(&self) -> Schedule {
        let (rates, minimum) = match self {
            TariffEpoch::Pre2020 => ([dec!(0.62), dec!(0.66), dec!(0.75)], dec!(6.20)),
            TariffEpoch::Post2020 => ([dec!(0.65), dec!(0.70), dec!(0.79)], dec!(6.50)),
        };
        Schedule {
            adjustment: Adjustment::new(dec!(24), dec!(0)),
            bands: vec![
                Band::upto(dec!(66), rates[0]),
                Band::upto(dec!(86), rates[1]),
                Band::above(rates[2]),
            ],
            minimum: Some(minimum),
        }
    }
}

impl std::fmt::Display for TariffEpoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Statutory offset subtracted from a raw measurement, clamped to a floor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub offset: Decimal,
    pub floor: Decimal,
}

impl Adjustment {
    pub fn new(offset: Decimal, floor: Decimal) -> Self {
        Adjustment { offset, floor }
    }

    /// Raw value used as-is
    pub fn none() -> Self {
        Adjustment {
            offset: Decimal::ZERO,
            floor: Decimal::ZERO,
        }
    }

    pub fn apply(&self, raw: Decimal) -> Decimal {
        (raw - self.offset).max(self.floor)
    }
}

/// One marginal band. `limit` is the cumulative upper bound; `None` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub limit: Option<Decimal>,
    pub rate: Decimal,
}

impl Band {
    pub fn upto(limit: Decimal, rate: Decimal) -> Self {
        Band {
            limit: Some(limit),
            rate,
        }
    }

    pub fn above(rate: Decimal) -> Self {
        Band { limit: None, rate }
    }
}

/// Progressive bracket accumulation: each band is filled at its own rate
/// before the remainder spills into the next one.
///
/// Bands must be ordered by ascending limit. Any value beyond the last band's
/// limit is not charged, so schedules end with an open-ended band.
pub fn progressive(value: Decimal, bands: &[Band]) -> Decimal {
    let mut charge = Decimal::ZERO;
    let mut lower = Decimal::ZERO;

    for band in bands {
        let upper = band.limit.map_or(value, |limit| limit.min(value));
        if upper > lower {
            charge += (upper - lower) * band.rate;
        }
        match band.limit {
            Some(limit) if value > limit => lower = limit,
            _ => break,
        }
    }

    charge
}

/// Full tariff for one measurement: adjustment, bands and optional minimum charge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub adjustment: Adjustment,
    pub bands: Vec<Band>,
    pub minimum: Option<Decimal>,
}

impl Schedule {
    /// Unrounded charge for a raw measurement, before any minimum
    pub fn charge(&self, raw: Decimal) -> Decimal {
        progressive(self.adjustment.apply(raw), &self.bands)
    }
}
