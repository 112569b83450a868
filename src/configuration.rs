use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::viewmodel::RegionRule;

pub const DEFAULT_TITLE: &str = "選舉金流";

#[derive(Debug, Deserialize)]
struct Config {
    title: Option<String>,
    elections: String,
    candidates: Option<String>,
    output: Option<String>,
    base_url: Option<String>,
    #[serde(default)]
    legacy_region_rule: bool,
}

fn config_contents(input_file: &Path) -> Result<Config> {
    let mut fd = File::open(input_file).map_err(|e| Error::io(input_file, e))?;

    let mut buf = String::new();
    fd.read_to_string(&mut buf)
        .map_err(|e| Error::io(input_file, e))?;

    toml::from_str(&buf).map_err(|e| Error::Toml {
        path: input_file.to_path_buf(),
        source: e,
    })
}

/// One site to generate, with every path resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub title: String,
    pub elections: PathBuf,
    pub candidates: Option<PathBuf>,
    pub output: PathBuf,
    pub base_url: String,
    pub region_rule: RegionRule,
}

impl Site {
    /// A site with default settings reading `elections` and writing to `output`.
    pub fn new(elections: PathBuf, output: PathBuf) -> Site {
        Site {
            title: DEFAULT_TITLE.to_string(),
            elections,
            candidates: None,
            output,
            base_url: "/".to_string(),
            region_rule: RegionRule::default(),
        }
    }
}

// links are built as `{base_url}elections/...`, so the base always ends in '/'
fn normalize_base_url(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    }
}

fn site_from(config: Config, dir: &Path) -> Result<Site> {
    let in_dir = |s: &str| -> PathBuf { dir.join(s) };
    if config.elections.trim().is_empty() {
        return Err(Error::Config("`elections` must name a data file".to_string()));
    }
    Ok(Site {
        title: config.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        elections: in_dir(&config.elections),
        candidates: config.candidates.as_ref().map(|c| in_dir(c)),
        output: in_dir(config.output.as_ref().map_or("public", String::as_str)),
        base_url: normalize_base_url(config.base_url.as_ref().map_or("/", String::as_str)),
        region_rule: if config.legacy_region_rule {
            RegionRule::Legacy
        } else {
            RegionRule::Exact
        },
    })
}

/// Reads a site config; relative paths inside it are taken relative to
/// the directory holding the config file.
pub fn read_config(input_file: &Path) -> Result<Site> {
    let config = config_contents(input_file)?;
    let dir = match input_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    site_from(config, &dir)
}
