//! vpkette binary entry point.
//!
//! A thin wrapper around the vpkette-terrain library that parses the
//! command line, initializes logging and runs one subcommand.

use anyhow::{Context, Result};
use vpkette_formats::vpk::VpkReader;
use vpkette_terrain::{Cli, Command, extract_all, patch_archive};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::from_args();

    match &cli.command {
        Command::Terrains => {
            let catalog = cli.load_catalog()?;
            for terrain in catalog.iter() {
                println!("{:>2}: {} ({})", terrain.number, terrain.name, terrain.file);
            }
        }

        Command::Apply { terrain } => {
            let catalog = cli.load_catalog()?;
            let terrain = catalog.select(terrain)?;
            let paths = cli.game_paths()?;
            let output = paths.prepare_staging(&cli.language)?;

            patch_archive(
                &paths.base_archive(),
                &paths.override_archive(terrain.file),
                &output,
            )
            .with_context(|| format!("failed to apply terrain '{}'", terrain.name))?;

            println!(
                "Applied terrain: {}. Launch Dota 2 with the \"-language {}\" launch option",
                terrain.name, cli.language
            );
        }

        Command::List { archive } => {
            let reader = VpkReader::open(archive)
                .with_context(|| format!("failed to open {}", archive.display()))?;
            let index = reader.index();
            println!(
                "VPK v{}: {} files, {} tree bytes",
                index.header.version,
                index.len(),
                index.header.tree_length
            );
            for (path, entry) in index.iter() {
                println!(
                    "{:08x} {:>10} {:>5} {}",
                    entry.crc32,
                    entry.total_length(),
                    entry.archive_index,
                    path
                );
            }
        }

        Command::Extract { archive, target } => {
            let summary = extract_all(archive, target)?;
            println!(
                "Extracted {} files ({} bytes) to {}",
                summary.files,
                summary.bytes,
                target.display()
            );
        }
    }

    Ok(())
}
