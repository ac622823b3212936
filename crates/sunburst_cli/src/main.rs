//! CLI probe for the sunburst engine.
//!
//! # Responsibility
//! - Import an indented outline (file argument or stdin), optionally
//!   calibrate one level, and print the resolved sector table.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `sunburst_cli [--calibrate <level>] [outline-file]`

use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use sunburst_core::{build_sectors, calibrate, import_outline, LoggingConfig};

#[derive(Debug, Parser)]
#[command(
    name = "sunburst_cli",
    about = "Print the sector table of an indented outline",
    version
)]
struct Args {
    /// Equalize sectors at this level index before printing.
    #[arg(long, value_name = "LEVEL")]
    calibrate: Option<usize>,

    /// Outline file; stdin when omitted.
    input: Option<PathBuf>,
}

fn read_outline(input: Option<&Path>) -> Result<String, String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| format!("failed to read `{}`: {err}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| format!("failed to read stdin: {err}"))?;
            Ok(text)
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    if let Err(err) = LoggingConfig::from_env().apply() {
        eprintln!("logging disabled: {err}");
    }

    let text = read_outline(args.input.as_deref())?;
    let mut chart = import_outline(&text).map_err(|err| err.to_string())?;
    if let Some(level) = args.calibrate {
        calibrate(&mut chart, level);
    }

    let levels = build_sectors(&chart).map_err(|err| err.to_string())?;
    println!("sunburst_core version={}", sunburst_core::core_version());
    for ring in &levels {
        println!(
            "level={} radius={}..{} sectors={}",
            ring.level_index,
            ring.level.inner_radius,
            ring.level.outer_radius,
            ring.sectors.len()
        );
        for sector in &ring.sectors {
            let color = sector
                .properties
                .as_ref()
                .and_then(|props| props.color.as_ref())
                .map(|color| color.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<12} {:>8.4} {}{} color={}",
                sector.id.as_str(),
                sector.value,
                sector.name,
                if sector.placeholder { " (gap)" } else { "" },
                color
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::{CommandFactory, Parser};
    use std::path::Path;

    #[test]
    fn args_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_calibrate_level_and_input() {
        let args = Args::try_parse_from(["sunburst_cli", "--calibrate", "2", "chart.txt"]).unwrap();
        assert_eq!(args.calibrate, Some(2));
        assert_eq!(args.input.as_deref(), Some(Path::new("chart.txt")));

        let args = Args::try_parse_from(["sunburst_cli"]).unwrap();
        assert_eq!(args.calibrate, None);
        assert!(args.input.is_none());
    }

    #[test]
    fn rejects_non_numeric_level() {
        assert!(Args::try_parse_from(["sunburst_cli", "--calibrate", "deep"]).is_err());
    }
}
