//! Larder CLI - your pantry and recipes in the terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{cook, demo, logs, pantry, recipe, recognize, status, user};
use larder_core::services::LogEvent;

/// Larder - pantry and recipes in your terminal
#[derive(Parser)]
#[command(name = "larder", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show activity summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register a new account
    Register {
        /// Username
        username: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log in
    Login {
        /// Username
        username: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log out
    Logout,

    /// Manage pantry items
    Pantry {
        #[command(subcommand)]
        command: pantry::PantryCommands,
    },

    /// Browse and rank recipes
    Recipe {
        #[command(subcommand)]
        command: recipe::RecipeCommands,
    },

    /// Log cooking and view history
    Cook {
        #[command(subcommand)]
        command: cook::CookCommands,
    },

    /// Recognize ingredients in photos
    Recognize {
        #[command(subcommand)]
        command: recognize::RecognizeCommands,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// View application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logger = commands::get_logger();
    let command_name = command_name(&cli.command);
    commands::log_event(&logger, LogEvent::new("command_executed").with_command(command_name));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::log_event(
                &logger,
                LogEvent::new("command_failed")
                    .with_command(command_name)
                    .with_error(e.to_string()),
            );
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Status { .. } => "status",
        Commands::Register { .. } => "register",
        Commands::Login { .. } => "login",
        Commands::Logout => "logout",
        Commands::Pantry { .. } => "pantry",
        Commands::Recipe { .. } => "recipe",
        Commands::Cook { .. } => "cook",
        Commands::Recognize { .. } => "recognize",
        Commands::Demo { .. } => "demo",
        Commands::Logs { .. } => "logs",
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json),
        Commands::Register { username, password } => user::register(&username, password),
        Commands::Login { username, password } => user::login(&username, password),
        Commands::Logout => user::logout(),
        Commands::Pantry { command } => pantry::run(command),
        Commands::Recipe { command } => recipe::run(command),
        Commands::Cook { command } => cook::run(command),
        Commands::Recognize { command } => recognize::run(command),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
