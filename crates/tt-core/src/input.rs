//! Opening simulation input files.
//!
//! Simulation runs usually leave their outputs gzip-compressed
//! (`output_events.xml.gz`).  [`open_input`] decompresses transparently, and
//! [`InputFormat::from_path`] looks through the `.gz` suffix to the real
//! extension.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

/// On-disk layout of an events, plans or network file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InputFormat {
    /// Flat tables with a header row.
    #[default]
    Csv,
    /// MATSim XML (`<events>`, `<population>`, `<network>`).
    Xml,
}

impl InputFormat {
    /// `Xml` for `*.xml` and `*.xml.gz`, `Csv` for everything else.
    pub fn from_path(path: &Path) -> Self {
        let inner = if is_gzip(path) { path.file_stem().map(Path::new) } else { Some(path) };
        match inner.and_then(Path::extension) {
            Some(ext) if ext.eq_ignore_ascii_case("xml") => InputFormat::Xml,
            _ => InputFormat::Csv,
        }
    }
}

/// `true` when `path` ends in `.gz`.
pub fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Open `path` for buffered reading, gunzipping `*.gz` files on the fly.
pub fn open_input(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
