//! Schema command - print the expected profile input format

use crate::tax::ProfileInput;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema or fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the profile input
    JsonSchema,
    /// Field descriptions with units
    Fields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::Fields => self.print_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(ProfileInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_fields(&self) -> anyhow::Result<()> {
        println!("Profile Input Format");
        println!("====================");
        println!();
        for field in ProfileInput::field_schema() {
            let req = if field.required { "required" } else { "optional" };
            let unit = field.unit.map_or(String::new(), |u| format!("[{}]", u));
            println!(
                "{:20} ({:8}) {:7} {}",
                field.name, req, unit, field.description
            );
        }
        println!();
        println!("Measurements are only required for the class and drive type that use them.");
        Ok(())
    }
}
