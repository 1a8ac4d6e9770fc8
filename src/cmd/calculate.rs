//! Calculate command - tax for a single vehicle given as flags or a JSON profile

use super::{field_label, format_eur, format_quantity, read_profile};
use crate::tax::{calculate_tax, DriveType, ProfileInput, TaxResult, VehicleClass, VehicleProfile};
use crate::utils::write_csv;
use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CalculateCommand {
    /// JSON file containing the vehicle profile ("-" reads stdin)
    #[arg(
        short,
        long,
        conflicts_with_all = [
            "class",
            "drive",
            "registered",
            "power",
            "weight",
            "displacement",
            "co2",
        ]
    )]
    file: Option<PathBuf>,

    /// Vehicle class
    #[arg(short, long, value_enum, required_unless_present = "file")]
    class: Option<VehicleClassArg>,

    /// Drive type
    #[arg(short, long, value_enum, required_unless_present = "file")]
    drive: Option<DriveTypeArg>,

    /// First registration date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    registered: Option<NaiveDate>,

    /// Engine or electric motor power in kW
    #[arg(short, long, allow_negative_numbers = true)]
    power: Option<Decimal>,

    /// Vehicle weight in kg
    #[arg(short, long, allow_negative_numbers = true)]
    weight: Option<Decimal>,

    /// Engine displacement in cc
    #[arg(long, allow_negative_numbers = true)]
    displacement: Option<Decimal>,

    /// CO2 emissions in g/km
    #[arg(long, allow_negative_numbers = true)]
    co2: Option<Decimal>,

    /// Show the calculation details table
    #[arg(long)]
    details: bool,

    /// Output as JSON instead of formatted text
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output the calculation breakdown as CSV
    #[arg(long)]
    csv: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum VehicleClassArg {
    /// Motorcycles and similar (L1e-L5e)
    L,
    /// Passenger cars up to 3.5t
    M1,
}

impl From<VehicleClassArg> for VehicleClass {
    fn from(arg: VehicleClassArg) -> Self {
        match arg {
            VehicleClassArg::L => VehicleClass::L,
            VehicleClassArg::M1 => VehicleClass::M1,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DriveTypeArg {
    Electric,
    /// Combustion engine or any other drive
    Combustion,
}

impl From<DriveTypeArg> for DriveType {
    fn from(arg: DriveTypeArg) -> Self {
        match arg {
            DriveTypeArg::Electric => DriveType::Electric,
            DriveTypeArg::Combustion => DriveType::Combustion,
        }
    }
}

impl CalculateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = match &self.file {
            Some(path) => read_profile(path)?,
            None => self.input_from_flags()?,
        };
        let profile = input.into_profile()?;
        log::info!(
            "Loaded {} {} profile registered {}",
            profile.vehicle().class(),
            profile.vehicle().drive_type(),
            profile.registered()
        );

        let result = calculate_tax(&profile);
        let stdout = io::stdout();
        let mut out = stdout.lock();

        if self.json {
            let output = CalculationOutput::new(&profile, &result);
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        } else if self.csv {
            write_csv(component_rows(&result), out)?;
        } else {
            print_result(&mut out, &result)?;
            if self.details {
                print_details(&mut out, &profile, &result)?;
            }
        }
        Ok(())
    }

    fn input_from_flags(&self) -> anyhow::Result<ProfileInput> {
        let (Some(class), Some(drive)) = (self.class, self.drive) else {
            anyhow::bail!("--class and --drive are required unless --file is given");
        };
        let registered = self
            .registered
            .unwrap_or_else(|| Local::now().date_naive());
        Ok(ProfileInput {
            power_kw: self.power,
            weight_kg: self.weight,
            displacement_cc: self.displacement,
            co2_emissions: self.co2,
            ..ProfileInput::new(class.into(), drive.into(), registered)
        })
    }
}

/// The two-line result shared by every front end
pub fn print_result<W: Write>(out: &mut W, result: &TaxResult) -> io::Result<()> {
    writeln!(out, "Monthly insurance tax: {}", format_eur(result.monthly))?;
    writeln!(out, "Annual insurance tax: {}", format_eur(result.annual))
}

fn print_details<W: Write>(
    out: &mut W,
    profile: &VehicleProfile,
    result: &TaxResult,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "CALCULATION DETAILS")?;
    let table = Table::new(detail_rows(profile, result))
        .with(Style::rounded())
        .to_string();
    writeln!(out, "{}", table)?;

    writeln!(out)?;
    writeln!(out, "BREAKDOWN")?;
    let table = Table::new(component_rows(result))
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    writeln!(out, "{}", table)?;

    if let Some(minimum) = result.minimum_applied {
        writeln!(out, "Minimum monthly tax of {} applied", format_eur(minimum))?;
    }
    Ok(())
}

#[derive(Debug, Clone, Tabled)]
struct DetailRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn detail_rows(profile: &VehicleProfile, result: &TaxResult) -> Vec<DetailRow> {
    let vehicle = profile.vehicle();
    let mut rows = vec![
        DetailRow {
            field: "Vehicle Class".to_string(),
            value: vehicle.class().to_string(),
        },
        DetailRow {
            field: "Drive Type".to_string(),
            value: vehicle.drive_type().to_string(),
        },
        DetailRow {
            field: "Registration Date".to_string(),
            value: profile.registered().format("%Y-%m-%d").to_string(),
        },
        DetailRow {
            field: "Tariff".to_string(),
            value: result.epoch.to_string(),
        },
    ];

    // zero measurements are not echoed
    rows.extend(
        vehicle
            .measurements()
            .into_iter()
            .filter(|(_, value)| !value.is_zero())
            .map(|(field, value)| DetailRow {
                field: field_label(field).to_string(),
                value: format!("{:.1}", value.round_dp(1)),
            }),
    );
    rows
}

/// Breakdown row for table and CSV output
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ComponentRow {
    #[tabled(rename = "Component")]
    pub component: String,

    #[tabled(rename = "Input")]
    pub raw: String,

    #[tabled(rename = "Adjusted")]
    pub adjusted: String,

    #[tabled(rename = "Monthly")]
    pub amount: String,
}

fn component_rows(result: &TaxResult) -> Vec<ComponentRow> {
    result
        .components
        .iter()
        .map(|c| ComponentRow {
            component: c.name.to_string(),
            raw: format_quantity(c.raw),
            adjusted: format_quantity(c.adjusted),
            amount: format_quantity(c.amount),
        })
        .collect()
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct CalculationOutput {
    vehicle_class: String,
    drive_type: String,
    registration_date: String,
    tariff: String,
    components: Vec<ComponentRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum_applied: Option<String>,
    monthly_tax: String,
    annual_tax: String,
}

impl CalculationOutput {
    fn new(profile: &VehicleProfile, result: &TaxResult) -> Self {
        CalculationOutput {
            vehicle_class: profile.vehicle().class().to_string(),
            drive_type: profile.vehicle().drive_type().to_string(),
            registration_date: profile.registered().format("%Y-%m-%d").to_string(),
            tariff: result.epoch.to_string(),
            components: component_rows(result),
            minimum_applied: result.minimum_applied.map(|m| format!("{:.2}", m)),
            monthly_tax: format!("{:.2}", result.monthly),
            annual_tax: format!("{:.2}", result.annual),
        }
    }
}
