//! Minimizes a single-output PLA table and prints the result.
//!
//! Usage: `cargo run --example minimize-pla -- data/table.pla`

use std::path::PathBuf;

use clap::Parser;

use espresso_rs::espresso::{espresso_cover, EspressoOptions};
use espresso_rs::pla::Pla;

#[derive(Parser)]
#[command(about = "Minimize a single-output PLA table")]
struct Cli {
    /// Path to the input PLA file.
    path: PathBuf,

    /// Compute the off-set explicitly and expand against it.
    #[arg(long)]
    off_set: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.path)?;
    let pla = Pla::parse(&text)?;
    log::info!(
        "{}: {} inputs, {} on-set cubes, {} dc-set cubes",
        cli.path.display(),
        pla.inputs,
        pla.on_set.len(),
        pla.dc_set.len()
    );

    let options = EspressoOptions {
        compute_off_set: cli.off_set,
        ..Default::default()
    };

    let time_start = std::time::Instant::now();
    let minimized = espresso_cover(&pla.on_set, &pla.dc_set, &options);
    let elapsed = time_start.elapsed();

    let literals_before: usize = pla.on_set.iter().map(|c| c.len()).sum();
    let literals_after: usize = minimized.iter().map(|c| c.len()).sum();
    log::info!(
        "minimized {} -> {} cubes, {} -> {} literals in {:?}",
        pla.on_set.len(),
        minimized.len(),
        literals_before,
        literals_after,
        elapsed
    );

    print!("{}", Pla::write(pla.inputs, &minimized));

    Ok(())
}
