//! Demo command - manage demo mode

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::get_larder_dir;
use larder_core::services::{DemoService, DEMO_USERNAME};

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Enable demo mode
    #[command(name = "on")]
    On,
    /// Disable demo mode
    #[command(name = "off")]
    Off,
    /// Show demo mode status
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let larder_dir = get_larder_dir();
    std::fs::create_dir_all(&larder_dir)?;
    let demo_service = DemoService::new(&larder_dir);

    match command {
        Some(DemoCommands::On) => {
            demo_service.enable()?;
            println!("{}", "Demo mode enabled".green());
            println!(
                "Logged in as '{}' with a stocked pantry. Run 'larder status' to look around.",
                DEMO_USERNAME
            );
            Ok(())
        }
        Some(DemoCommands::Off) => {
            demo_service.disable(false)?; // Keep demo data by default
            println!("{}", "Demo mode disabled".yellow());
            Ok(())
        }
        Some(DemoCommands::Status) | None => {
            if demo_service.is_enabled()? {
                println!("Demo mode is {}", "ON".green());
            } else {
                println!("Demo mode is {}", "OFF".yellow());
            }
            Ok(())
        }
    }
}
