//! Prompt command - interactive line-based calculator

use super::calculate::print_result;
use crate::tax::{calculate_tax, tariff::cutover_date, DriveType, ProfileInput, VehicleClass};
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};

#[derive(Args, Debug)]
pub struct PromptCommand {}

impl PromptCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        Prompt::new(stdin.lock(), stdout.lock()).run()
    }
}

/// Asks for the vehicle data one question at a time, showing only the
/// questions relevant to the answers given so far.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompt { input, output }
    }

    /// Collect a profile, calculate and print the result
    pub fn run(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "Austrian Motor Vehicle Insurance Tax Calculator")?;
        writeln!(self.output, "-----------------------------------------------")?;

        let input = self.collect()?;
        let profile = input.into_profile()?;
        let result = calculate_tax(&profile);

        writeln!(self.output)?;
        print_result(&mut self.output, &result)?;
        Ok(())
    }

    pub fn collect(&mut self) -> anyhow::Result<ProfileInput> {
        writeln!(self.output)?;
        writeln!(self.output, "Vehicle Class:")?;
        writeln!(self.output, "1. L-class (motorcycles)")?;
        writeln!(self.output, "2. M1-class (passenger cars up to 3.5t)")?;
        let class = match self.ask_choice("Select vehicle class (1/2): ", 2)? {
            1 => VehicleClass::L,
            _ => VehicleClass::M1,
        };

        writeln!(self.output)?;
        writeln!(self.output, "Drive Type:")?;
        writeln!(self.output, "1. Electric")?;
        writeln!(self.output, "2. Combustion/Other")?;
        let drive = match self.ask_choice("Select drive type (1/2): ", 2)? {
            1 => DriveType::Electric,
            _ => DriveType::Combustion,
        };

        writeln!(self.output)?;
        let registered = self.ask_date("Registration date (YYYY-MM-DD): ")?;

        let mut input = ProfileInput::new(class, drive, registered);

        match (class, drive) {
            (_, DriveType::Electric) => {
                input.power_kw = Some(self.ask_quantity("Electric motor power (kW): ")?);
                if class == VehicleClass::M1 {
                    input.weight_kg = Some(self.ask_quantity("Vehicle weight (kg): ")?);
                }
            }
            (VehicleClass::L, DriveType::Combustion) => {
                input.displacement_cc = Some(self.ask_quantity("Engine displacement (cc): ")?);
                if registered >= cutover_date() {
                    input.co2_emissions = Some(self.ask_quantity("CO2 emissions (g/km): ")?);
                }
            }
            (VehicleClass::M1, DriveType::Combustion) => {
                input.power_kw = Some(self.ask_quantity("Engine power (kW): ")?);
            }
        }

        Ok(input)
    }

    fn ask(&mut self, question: &str) -> anyhow::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            anyhow::bail!("input ended before all questions were answered");
        }
        Ok(line.trim().to_string())
    }

    fn ask_choice(&mut self, question: &str, options: usize) -> anyhow::Result<usize> {
        loop {
            let answer = self.ask(question)?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=options).contains(&n) => return Ok(n),
                _ => writeln!(self.output, "Please enter a number from 1 to {}", options)?,
            }
        }
    }

    fn ask_date(&mut self, question: &str) -> anyhow::Result<NaiveDate> {
        loop {
            let answer = self.ask(question)?;
            match NaiveDate::parse_from_str(&answer, "%Y-%m-%d") {
                Ok(date) => return Ok(date),
                Err(_) => writeln!(self.output, "Please enter a date as YYYY-MM-DD")?,
            }
        }
    }

    fn ask_quantity(&mut self, question: &str) -> anyhow::Result<Decimal> {
        loop {
            let answer = self.ask(question)?;
            match answer.parse::<Decimal>() {
                Ok(value) if value >= Decimal::ZERO => return Ok(value),
                Ok(_) => writeln!(self.output, "Value must not be negative")?,
                Err(_) => writeln!(self.output, "Please enter a number")?,
            }
        }
    }
}
