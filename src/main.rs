extern crate log;
pub mod config;
pub mod crs;
pub mod error;
pub mod geofile;
pub mod osm;
pub mod pipeline;
use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Extract power lines from an OpenStreetMap PBF extract into a shapefile.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input OSM PBF file.
    osmpbf_file: PathBuf,

    /// Path to an optional YAML config file.
    #[arg(short, long)]
    config_filepath: Option<PathBuf>,
}

fn try_main(args: Args) -> anyhow::Result<()> {
    let config = match &args.config_filepath {
        Some(config_filepath) => Config::from_file(config_filepath)?,
        None => Config::default(),
    };
    log::info!(
        "Converting {:?} to {}",
        args.osmpbf_file,
        config.driver.name()
    );

    let summary = pipeline::run(&args.osmpbf_file, &config)?;
    log::info!("Read {} OSM entities", summary.entities_read);
    match summary.output {
        Some(output) => {
            log::info!(
                "Wrote {} features to {:?}",
                summary.features_written,
                output.geofile
            );
        }
        None => log::info!("Nothing written"),
    }
    Ok(())
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();

    // Usage errors, --help and --version are printed without signalling failure.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            if let Err(print_err) = err.print() {
                log::error!("Could not print usage: {}", print_err);
            }
            return;
        }
    };
    if let Err(e) = try_main(args) {
        log::error!("{:?}", e);
        std::process::exit(1)
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use rstest::rstest;
    use std::path::PathBuf;

    use super::Args;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_positional_input() {
        let args = Args::try_parse_from(["osm_powerlines", "luxembourg-latest.osm.pbf"]).unwrap();
        assert_eq!(args.osmpbf_file, PathBuf::from("luxembourg-latest.osm.pbf"));
        assert_eq!(args.config_filepath, None);
    }

    #[test]
    fn test_config_flag() {
        let args = Args::try_parse_from([
            "osm_powerlines",
            "luxembourg-latest.osm.pbf",
            "--config-filepath",
            "powerlines.yaml",
        ])
        .unwrap();
        assert_eq!(args.config_filepath, Some(PathBuf::from("powerlines.yaml")));
    }

    #[rstest]
    #[case(vec!["osm_powerlines"])]
    #[case(vec!["osm_powerlines", "a.osm.pbf", "b.osm.pbf"])]
    fn test_wrong_argument_count(#[case] argv: Vec<&str>) {
        assert!(Args::try_parse_from(argv).is_err());
    }
}
