use clap::{Parser, Subcommand};
use mitax::cmd::{
    calculate::CalculateCommand, prompt::PromptCommand, schema::SchemaCommand,
    tariff::TariffCommand,
};

#[derive(Parser, Debug)]
#[command(
    name = "mitax",
    version,
    about = "Austrian Motor Vehicle Insurance Tax Calculator"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate the monthly and annual tax for one vehicle
    Calculate(CalculateCommand),
    /// Enter the vehicle data interactively
    Prompt(PromptCommand),
    /// Show the statutory tariff for a registration date
    Tariff(TariffCommand),
    /// Print the expected profile input format
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Calculate(cmd) => cmd.exec(),
        Command::Prompt(cmd) => cmd.exec(),
        Command::Tariff(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
