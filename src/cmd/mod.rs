pub mod calculate;
pub mod prompt;
pub mod schema;
pub mod tariff;

use crate::tax::{self, ProfileInput};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read a profile (JSON) from a file, or from stdin with "-"
pub fn read_profile(path: &Path) -> anyhow::Result<ProfileInput> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        let file = File::open(path)?;
        tax::read_profile_json(BufReader::new(file))
    }
}

fn read_from_stdin() -> anyhow::Result<ProfileInput> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    tax::read_profile_json(io::Cursor::new(buffer))
}

pub fn format_eur(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-€{:.2}", amount.abs())
    } else {
        format!("€{:.2}", amount)
    }
}

fn format_quantity(qty: Decimal) -> String {
    let s = format!("{:.4}", qty.round_dp(4));
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// Human readable label for a measurement field
fn field_label(field: &str) -> &'static str {
    match field {
        "power_kw" => "Power (kW)",
        "weight_kg" => "Weight (kg)",
        "displacement_cc" => "Engine Displacement (cc)",
        "co2_g_per_km" => "CO2 Emissions (g/km)",
        _ => "Value",
    }
}
