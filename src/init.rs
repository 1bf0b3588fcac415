use std::fs;
use std::path::Path;

use owo_colors::OwoColorize;

use crate::error::Result;
use crate::paths;
use crate::state::{self, Config};

enum Status {
    Created,
    Exists,
    Error,
}

fn print_status(status: Status, msg: &str) {
    match status {
        Status::Created => println!("  {} {msg}", "✓".green()),
        Status::Exists => println!("  {} {msg}", "~".yellow()),
        Status::Error => println!("  {} {msg}", "✗".red()),
    }
}

fn ensure_dir(path: &Path, label: &str) {
    if path.exists() {
        print_status(Status::Exists, &format!("{label} already exists"));
    } else {
        match fs::create_dir_all(path) {
            Ok(()) => print_status(Status::Created, &format!("Created {label}")),
            Err(e) => print_status(Status::Error, &format!("Failed to create {label}: {e}")),
        }
    }
}

/// Write the default config unless one is already there.
fn write_config_if_missing(path: &Path) {
    if path.exists() {
        print_status(Status::Exists, "config.json already exists — preserved");
        return;
    }
    match state::save_config_to(&Config::default(), path) {
        Ok(()) => print_status(Status::Created, "Created config.json"),
        Err(e) => print_status(Status::Error, &format!("Failed to create config.json: {e}")),
    }
}

pub fn run() -> Result<()> {
    println!("\n{} — initializing\n", "fitwatch".bold());

    let dir = paths::fitwatch_dir()?;
    ensure_dir(&dir, "fitwatch directory");
    write_config_if_missing(&paths::config_file()?);

    println!(
        "\n{} Edit {} to point at your dataset.\n\n\
         \x20 Commands:\n\
         \x20   fitwatch lookup <matricule>  — Per-agent dashboard\n\
         \x20   fitwatch alerts              — Agents currently in alert\n\
         \x20   fitwatch status              — Dataset summary\n",
        "Setup complete.".bold(),
        paths::config_file()?.display()
    );
    Ok(())
}
