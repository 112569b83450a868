use std::path::{Path, PathBuf};
use std::process;

use clap::{crate_version, App, Arg};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use electionflow::configuration;
use electionflow::site;
use electionflow::viewmodel::RegionRule;

fn main() {
    let matches = App::new("electionflow")
        .version(crate_version!())
        .about("Renders election campaign-finance data as a static site")
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("DIR")
                .takes_value(true)
                .help("Write the site here instead of the configured output directory"),
        )
        .arg(
            Arg::with_name("legacy-region-rule")
                .long("legacy-region-rule")
                .help("Treat every region as nationwide, as the original site did"),
        )
        .arg(
            Arg::with_name("CONFIG")
                .help("Site configuration files (TOML)")
                .required(true)
                .multiple(true),
        )
        .get_matches();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let output = matches.value_of("output").map(PathBuf::from);
    let legacy = matches.is_present("legacy-region-rule");

    let mut failed = false;
    for fname in matches.values_of("CONFIG").into_iter().flatten() {
        let mut site = match configuration::read_config(Path::new(fname)) {
            Ok(site) => site,
            Err(e) => {
                error!("{}", e);
                failed = true;
                continue;
            }
        };
        if let Some(ref dir) = output {
            site.output = dir.clone();
        }
        if legacy {
            site.region_rule = RegionRule::Legacy;
        }
        match site::build(&site) {
            Ok(summary) => info!("{}: {} pages", fname, summary.pages),
            Err(e) => {
                error!("{}: {}", fname, e);
                failed = true;
            }
        }
    }
    if failed {
        process::exit(1);
    }
}
