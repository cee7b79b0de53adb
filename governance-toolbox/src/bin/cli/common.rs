use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use serde::de::DeserializeOwned;
use snapshot_lib::{name_map_from_raw, NameMap, ProtocolSettings};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Common {
    /// Path to a json encoded `ProtocolSettings`, defaults are used otherwise
    #[structopt(long)]
    pub protocol: Option<PathBuf>,

    /// Output file, standard output if not set
    #[structopt(long)]
    pub output: Option<PathBuf>,
}

impl Common {
    pub fn load_settings(&self) -> Result<ProtocolSettings, Report> {
        match &self.protocol {
            Some(path) => read_json(path),
            None => Ok(ProtocolSettings::default()),
        }
    }

    pub fn open_output(&self) -> Result<Box<dyn Write>, Report> {
        Ok(match &self.output {
            Some(path) => Box::new(BufWriter::new(
                File::create(path).wrap_err_with(|| format!("creating {}", path.display()))?,
            )),
            None => Box::new(std::io::stdout()),
        })
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Report> {
    let file = File::open(path).wrap_err_with(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .wrap_err_with(|| format!("parsing {}", path.display()))
}

/// Loads an address to name mapping; invalid addresses are skipped.
pub fn read_names(path: Option<&Path>) -> Result<NameMap, Report> {
    match path {
        Some(path) => Ok(name_map_from_raw(read_json::<HashMap<String, String>>(path)?)),
        None => Ok(NameMap::new()),
    }
}
