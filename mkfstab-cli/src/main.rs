// SPDX-License-Identifier: GPL-3.0-only

//! Render fstab entries and udev automount rules from a filesystem list

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mkfstab::{DEFAULT_INPUT_PATH, InputFormat};
use tracing_subscriber::EnvFilter;

/// Generate fstab and udev rules from a declarative filesystem list
#[derive(Parser)]
#[command(name = "mkfstab")]
#[command(version, about = "Generate fstab and udev rules from a filesystem list", long_about = None)]
struct Cli {
    /// Filesystem list to read
    #[arg(short, long, default_value = DEFAULT_INPUT_PATH, value_parser = existing_file)]
    input: PathBuf,

    /// Write udev rules for encrypted automounts to this file
    #[arg(short, long)]
    udev: Option<PathBuf>,

    /// Input format, detected from the input file extension when omitted
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Write fstab to this file instead of stdout
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Yaml,
    Toml,
    Json,
}

impl From<FormatArg> for InputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Yaml => InputFormat::Yaml,
            FormatArg::Toml => InputFormat::Toml,
            FormatArg::Json => InputFormat::Json,
        }
    }
}

fn existing_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("{value} is not an existing file"))
    }
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing to stderr, stdout carries the fstab
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mkfstab=info,mkfstab_cli=info,warn")),
        )
        .init();

    let cli = Cli::parse();

    let format = cli
        .format
        .map(InputFormat::from)
        .unwrap_or_else(|| InputFormat::from_path(&cli.input));
    let records = mkfstab::load_records_as(&cli.input, format)
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    let generated = mkfstab::generate(&records)
        .with_context(|| format!("Invalid filesystem list in {}", cli.input.display()))?;

    match &cli.output {
        Some(path) => write_output(path, &generated.fstab)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(generated.fstab.as_bytes())
                .context("Failed to write fstab to stdout")?;
            stdout.flush()?;
        }
    }

    match &cli.udev {
        Some(path) => write_output(path, &generated.udev)?,
        None if generated.udev_entries > 0 => tracing::warn!(
            "{} encrypted automount entries need udev rules but no --udev path was given",
            generated.udev_entries
        ),
        None => {}
    }

    Ok(())
}
