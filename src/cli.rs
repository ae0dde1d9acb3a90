//! Command line front end: argument definitions and command dispatch

use clap::{Parser, Subcommand};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use crate::addressbook::AddressBook;
use crate::config::{load_config, Config, DEFAULT_CONFIG_FILE};
use crate::normalize::{DisplayVariant, Normalizer};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "th-iban", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encodes a hex address as a checksummed identifier
    Encode { address: String },
    /// Decodes a checksummed identifier into a hex address
    Decode { id: String },
    /// Checks user input and prints what is wrong with it
    Validate { input: String },
    /// Prints the canonical hex form of an address in either format
    Normalize { input: String },
    /// Shows every display variant of an address
    Show {
        input: String,
        /// Print only this variant
        #[arg(long)]
        variant: Option<DisplayVariant>,
    },
    /// Manages the address book
    Book {
        #[command(subcommand)]
        command: BookCommands,
    },
}

#[derive(Subcommand)]
pub enum BookCommands {
    /// Adds a labeled address
    Add {
        label: String,
        address: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Removes an entry by label
    Remove { label: String },
    /// Lists all entries
    List,
}

/// Execute a parsed command line. `Ok(false)` means the input was rejected
/// and the process should exit unsuccessfully.
pub fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = load_config(&cli.config)?;
    let normalizer = config.normalizer()?;

    match cli.command {
        Commands::Encode { address } => {
            println!("{}", normalizer.codec().encode(address.trim())?);
        }
        Commands::Decode { id } => {
            println!("{}", normalizer.codec().decode(id.trim())?);
        }
        Commands::Validate { input } => match normalizer.validate_input(&input) {
            Some(message) => {
                println!("{}", message.yellow());
                return Ok(false);
            }
            None => println!("{}", "OK".bright_green().bold()),
        },
        Commands::Normalize { input } => match normalizer.normalize(&input) {
            Some(address) => println!("{}", address),
            None => {
                eprintln!("{}", "Unrecognized address".yellow());
                return Ok(false);
            }
        },
        Commands::Show { input, variant } => return show(&normalizer, &config, &input, variant),
        Commands::Book { command } => book(&normalizer, &config, command)?,
    }

    Ok(true)
}

fn show(
    normalizer: &Normalizer,
    config: &Config,
    input: &str,
    variant: Option<DisplayVariant>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let Some(address) = normalizer.normalize(input) else {
        eprintln!(
            "{}",
            normalizer.validate_input(input).unwrap_or("Unrecognized address").yellow()
        );
        return Ok(false);
    };

    if let Some(variant) = variant {
        let rendered = normalizer
            .format_for_display(&address, variant)
            .ok_or("address cannot be displayed")?;
        println!("{}", rendered);
        return Ok(true);
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new("Variant"), Cell::new("Value")]);

    for variant in DisplayVariant::ALL {
        let name = if variant == config.display.variant {
            format!("{} (default)", variant)
        } else {
            variant.to_string()
        };
        let value = normalizer
            .format_for_display(&address, variant)
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }

    println!("{}", table);
    Ok(true)
}

fn book(
    normalizer: &Normalizer,
    config: &Config,
    command: BookCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = config.addressbook_path();
    let book = AddressBook::load_or_new(&path, normalizer.clone())?;

    match command {
        BookCommands::Add {
            label,
            address,
            notes,
        } => {
            let entry = book.add(&label, &address, notes.as_deref())?;
            book.save(&path)?;
            println!("{} {} → {}", "Added".bright_green(), entry.label, entry.address);
        }
        BookCommands::Remove { label } => {
            let entry = book.remove(&label)?;
            book.save(&path)?;
            println!("{} {}", "Removed".bright_green(), entry.label);
        }
        BookCommands::List => {
            if book.is_empty() {
                println!("{}", "Address book is empty.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![Cell::new("Label"), Cell::new("Address"), Cell::new("Notes")]);

            for entry in book.list() {
                let shown = normalizer
                    .format_for_display(&entry.address, config.display.variant)
                    .unwrap_or(entry.address);
                table.add_row(vec![
                    Cell::new(entry.label),
                    Cell::new(shown),
                    Cell::new(entry.notes.unwrap_or_default()),
                ]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}
