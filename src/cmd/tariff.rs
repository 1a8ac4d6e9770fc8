//! Tariff command - print the statutory rates in effect for a registration date

use super::{format_eur, format_quantity};
use crate::tax::{Schedule, TariffEpoch};
use chrono::{Local, NaiveDate};
use clap::Args;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct TariffCommand {
    /// First registration date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    registered: Option<NaiveDate>,
}

impl TariffCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let date = self.registered.unwrap_or_else(|| Local::now().date_naive());
        let epoch = TariffEpoch::from_date(date);

        println!();
        println!("TARIFF (registered {})", epoch);
        println!();

        for (title, schedule) in schedules(epoch) {
            print_schedule(title, &schedule);
        }
        Ok(())
    }
}

fn schedules(epoch: TariffEpoch) -> Vec<(&'static str, Schedule)> {
    let mut all = vec![
        ("L-class electric: power (kW)", epoch.l_electric_power()),
        (
            "L-class combustion: displacement (cc)",
            epoch.l_combustion_displacement(),
        ),
    ];
    if let Some(co2) = epoch.l_combustion_co2() {
        all.push(("L-class combustion: CO2 (g/km)", co2));
    }
    all.push(("M1-class electric: power (kW)", epoch.m1_electric_power()));
    all.push(("M1-class electric: weight (kg)", epoch.m1_electric_weight()));
    all.push(("M1-class combustion: power (kW)", epoch.m1_combustion_power()));
    all
}

#[derive(Debug, Clone, Tabled)]
struct BandRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

fn band_rows(schedule: &Schedule) -> Vec<BandRow> {
    let mut lower = rust_decimal::Decimal::ZERO;
    schedule
        .bands
        .iter()
        .map(|band| {
            let row = BandRow {
                from: format_quantity(lower),
                to: band.limit.map_or("-".to_string(), format_quantity),
                rate: format!("€{}", format_quantity(band.rate)),
            };
            if let Some(limit) = band.limit {
                lower = limit;
            }
            row
        })
        .collect()
}

fn print_schedule(title: &str, schedule: &Schedule) {
    println!("{}", title);
    println!(
        "  adjusted = max(value - {}, {})",
        format_quantity(schedule.adjustment.offset),
        format_quantity(schedule.adjustment.floor)
    );
    let table = Table::new(band_rows(schedule))
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
    if let Some(minimum) = schedule.minimum {
        println!("  minimum monthly tax: {}", format_eur(minimum));
    }
    println!();
}
