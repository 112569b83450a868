//
// Readers for the election and candidate data files. Any file may be
// gzip-compressed, in which case its name carries a trailing `.gz`; files
// made of several concatenated gzip members are read to the end.
//

pub mod candidates;
pub mod elections;

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
}

pub fn open(path: &Path) -> Result<Box<dyn Read>> {
    let f = File::open(path).map_err(|e| Error::io(path, e))?;
    let rdr = BufReader::new(f);
    if is_gzip(path) {
        Ok(Box::new(MultiGzDecoder::new(rdr)))
    } else {
        Ok(Box::new(rdr))
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("gz"))
}

// the format named by the extension, looking through any `.gz` suffix
pub fn format_of(path: &Path) -> Result<Format> {
    let inner = if is_gzip(path) {
        path.file_stem().map(Path::new)
    } else {
        Some(path)
    };
    let ext = inner
        .and_then(Path::extension)
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => Ok(Format::Json),
        Some("csv") => Ok(Format::Csv),
        _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
    }
}
