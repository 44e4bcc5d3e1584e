//! Gradebook - a small student grade manager over a JSON file

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};

mod manager;
mod student;

use manager::StudentManager;
use student::{parse_scores, Student};

/// Gradebook - manage student grades from the terminal
#[derive(Parser)]
#[command(name = "gradebook", version, about, long_about = None)]
struct Cli {
    /// Path to the data file
    #[arg(long, global = true, default_value = "students.json")]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new student
    Add {
        /// Unique student id
        student_id: String,
        /// Student name
        name: String,
        /// Initial scores as Course=Score pairs
        scores: Vec<String>,
    },
    /// Update a student's name or scores
    Update {
        /// Student id
        student_id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// Scores to set or add, as Course=Score pairs
        #[arg(long, num_args = 1..)]
        scores: Vec<String>,
    },
    /// Delete a student
    Delete {
        /// Student id
        student_id: String,
    },
    /// Show one student's scores
    Show {
        /// Student id
        student_id: String,
    },
    /// List all students
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show overall statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn run(cli: Cli) -> Result<()> {
    let mut manager = StudentManager::load(&cli.file)?;

    match cli.command {
        Commands::Add {
            student_id,
            name,
            scores,
        } => {
            let mut student = Student::new(&name);
            student.scores = parse_scores(&scores)?;
            manager.add(&student_id, student)?;
            println!("{} added {} ({})", "✓".green(), name, student_id);
        }
        Commands::Update {
            student_id,
            name,
            scores,
        } => {
            let scores = if scores.is_empty() {
                None
            } else {
                Some(parse_scores(&scores)?)
            };
            if name.is_none() && scores.is_none() {
                anyhow::bail!("nothing to update (pass --name or --scores)");
            }
            manager.update(&student_id, name.as_deref(), scores)?;
            println!("{} updated {}", "✓".green(), student_id);
        }
        Commands::Delete { student_id } => {
            manager.delete(&student_id)?;
            println!("{} deleted {}", "✓".green(), student_id);
        }
        Commands::Show { student_id } => {
            let student = manager.get(&student_id)?;
            println!("{} ({})", student.name.bold(), student_id);

            if student.scores.is_empty() {
                println!("No scores recorded.");
                return Ok(());
            }

            let mut table = create_table();
            table.set_header(vec!["Course", "Score"]);
            for (course, score) in &student.scores {
                table.add_row(vec![course.clone(), format!("{:.1}", score)]);
            }
            println!("{}", table);
            println!("Average: {:.2}", student.average());
        }
        Commands::List { json } => {
            let students = manager.list();

            if json {
                let entries: serde_json::Map<String, serde_json::Value> = students
                    .iter()
                    .map(|(id, student)| {
                        (
                            (*id).clone(),
                            serde_json::json!({
                                "name": student.name,
                                "scores": student.scores,
                                "average": student.average(),
                            }),
                        )
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            if students.is_empty() {
                println!("No students found.");
                return Ok(());
            }

            let mut table = create_table();
            table.set_header(vec!["ID", "Name", "Courses", "Average"]);
            for (id, student) in students {
                table.add_row(vec![
                    id.clone(),
                    student.name.clone(),
                    student.scores.len().to_string(),
                    format!("{:.2}", student.average()),
                ]);
            }
            println!("{}", table);
        }
        Commands::Stats { json } => {
            let stats = manager.stats();

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", "Gradebook Statistics".bold());
                println!("  Students: {}", stats.count);
                println!("  Overall average: {:.2}", stats.average);
            }
        }
    }

    Ok(())
}
