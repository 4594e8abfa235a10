//! cellgrid CLI - inspect clipboard payloads, copies and addresses

use anyhow::{Context, Result};
use cellgrid::prelude::*;
use cellgrid::{format_address, parse_address, ParsedAddress};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cellgrid")]
#[command(
    author,
    version,
    about = "Spreadsheet clipboard inspection tool"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a saved clipboard payload the way a paste would
    Paste {
        /// File holding the clipboard content
        input: PathBuf,

        /// Treat the file as the text/html flavor (default: text/plain)
        #[arg(long)]
        html: bool,

        /// Cell the paste lands on, relative formulas resolve against it
        #[arg(long, default_value = "A1")]
        at: String,

        /// Selection to tile the pasted block over
        #[arg(long)]
        select: Option<String>,

        /// Print the parsed cells as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy a tab separated file and print the HTML clipboard flavor
    Copy {
        /// Tab separated input file
        input: PathBuf,

        /// Mark the copy as part of a cut with this id
        #[arg(long)]
        cut_id: Option<String>,

        /// Print both flavors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how an address string is read
    Address {
        /// A1, $A$1, [col,row,sheet] or notebook cell id
        address: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Paste {
            input,
            html,
            at,
            select,
            json,
        } => paste(&input, html, &at, select.as_deref(), json),
        Commands::Copy {
            input,
            cut_id,
            json,
        } => copy(&input, cut_id, json),
        Commands::Address { address } => show_address(&address),
    }
}

fn read_input(input: &Path) -> Result<String> {
    std::fs::read_to_string(input).with_context(|| format!("Failed to read '{}'", input.display()))
}

fn paste(input: &Path, html: bool, at: &str, select: Option<&str>, json: bool) -> Result<()> {
    let content = read_input(input)?;

    let active_cell: CellAddress = at
        .parse()
        .with_context(|| format!("Invalid paste cell '{}'", at))?;
    let fill_selection = select
        .map(|range| {
            SheetSelection::parse(range).with_context(|| format!("Invalid selection '{}'", range))
        })
        .transpose()?;
    let options = PasteOptions {
        active_cell,
        fill_selection,
        ..PasteOptions::default()
    };

    let parsed = if html {
        parse_clipboard(Some(&content), None, &options)
    } else {
        parse_clipboard(None, Some(&content), &options)
    };

    eprintln!(
        "Parsed {:?} clipboard: {} rows x {} columns",
        parsed.source,
        parsed.height(),
        parsed.width()
    );
    if let Some(cut_id) = &parsed.cut_id {
        eprintln!("Cut id: {}", cut_id);
    }

    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &parsed).context("Failed to encode JSON")?;
        writeln!(stdout).context("Failed to write to stdout")?;
        return Ok(());
    }

    for row in &parsed.cells {
        let line: Vec<String> = row
            .iter()
            .map(|slot| match slot {
                Some(cell) if cell.is_merge_root() => format!(
                    "{} [{}x{}]",
                    cell.expression,
                    cell.row_span.unwrap_or(1),
                    cell.col_span.unwrap_or(1)
                ),
                Some(cell) => cell.expression.clone(),
                // Covered by a merge
                None => "^".to_string(),
            })
            .collect();
        writeln!(stdout, "{}", line.join("\t")).context("Failed to write to stdout")?;
    }

    Ok(())
}

fn copy(input: &Path, cut_id: Option<String>, json: bool) -> Result<()> {
    let content = read_input(input)?;
    let grid = cellgrid::parse_plain_text(&content).to_grid();

    let Some(bounds) = grid.bounds() else {
        eprintln!("Warning: input is empty");
        return Ok(());
    };

    let options = CopyOptions {
        cut_id,
        ..CopyOptions::default()
    };
    let payload = serialize_selection(&grid, &bounds.to_selection(), &options)
        .context("Failed to serialize selection")?;

    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &payload).context("Failed to encode JSON")?;
        writeln!(stdout).context("Failed to write to stdout")?;
    } else {
        writeln!(stdout, "{}", payload.html).context("Failed to write to stdout")?;
    }

    eprintln!("Copied {}", bounds);
    Ok(())
}

fn show_address(address: &str) -> Result<()> {
    let parsed =
        parse_address(address).with_context(|| format!("Failed to parse '{}'", address))?;

    match parsed {
        ParsedAddress::Cell {
            address,
            col_absolute,
            row_absolute,
        } => {
            println!("A1 cell: {}", address);
            println!("  Column: {} (absolute: {})", address.col, col_absolute);
            println!("  Row: {} (absolute: {})", address.row, row_absolute);
            println!(
                "  As written: {}",
                format_address(address.col, address.row, col_absolute, row_absolute)
            );
        }
        ParsedAddress::Sheet(sheet) => {
            println!("Sheet cell: {}", CellAddress::from(sheet));
            println!("  Column: {}", sheet.col);
            println!("  Row: {}", sheet.row);
            println!("  Sheet id: {}", sheet.sheet_id);
        }
        ParsedAddress::Notebook { row } => {
            println!("Notebook cell");
            println!("  Row: {}", row);
        }
    }

    Ok(())
}
