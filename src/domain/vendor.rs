use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::mac::{normalize_mac, OUI_KEY_LEN};

/// Vendor reported when a MAC prefix is not in the table
pub const UNKNOWN_VENDOR: &str = "Unknown Vendor";

/// OUI prefix -> vendor name mapping, loaded once and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct VendorTable {
    entries: HashMap<String, String>,
}

impl VendorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `PREFIX<TAB>VENDOR` records.
    ///
    /// Malformed lines, including lines that are not valid UTF-8, are skipped
    /// one at a time. A read error of the source yields an empty table, so
    /// callers degrade to unknown vendors rather than failing.
    pub fn load<R: Read>(source: R) -> Self {
        let mut reader = BufReader::new(source);
        let mut entries = HashMap::new();
        let mut buf = Vec::new();
        let mut line_number = 0;

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => line_number += 1,
                Err(e) => {
                    warn!(line = line_number + 1, error = %e, "Cannot read OUI database, vendors will be unknown");
                    return Self::new();
                }
            }

            let record = std::str::from_utf8(&buf).ok().and_then(parse_record);
            match record {
                Some((prefix, vendor)) => {
                    entries.insert(prefix, vendor);
                }
                None => debug!(line = line_number, "Skipped OUI record"),
            }
        }

        Self { entries }
    }

    /// Load the table from a file; a missing or unreadable file yields an
    /// empty table
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => {
                let table = Self::load(file);
                info!(path = %path.display(), entries = table.len(), "Loaded OUI database");
                table
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "OUI database unavailable, vendors will be unknown");
                Self::new()
            }
        }
    }

    /// Load the first candidate path that exists
    pub fn locate<I, P>(candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let candidates: Vec<PathBuf> = candidates.into_iter().map(Into::into).collect();
        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => Self::from_path(path),
            None => {
                warn!(?candidates, "No OUI database found, vendors will be unknown");
                Self::new()
            }
        }
    }

    /// Exact-match lookup of a 6-character prefix
    pub fn lookup(&self, prefix: &str) -> Option<&str> {
        self.entries.get(prefix).map(String::as_str)
    }

    /// Vendor for a prefix, or [`UNKNOWN_VENDOR`]
    pub fn vendor_for(&self, prefix: &str) -> &str {
        self.lookup(prefix).unwrap_or(UNKNOWN_VENDOR)
    }

    /// Resolve the vendor of a MAC address in any supported notation
    pub fn resolve(&self, mac: &str) -> &str {
        match normalize_mac(mac) {
            Ok(prefix) => {
                let vendor = self.vendor_for(&prefix);
                debug!(mac, prefix = %prefix, vendor, "Resolved vendor");
                vendor
            }
            Err(e) => {
                debug!(mac, error = %e, "Cannot normalize MAC address");
                UNKNOWN_VENDOR
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_record(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line.split('\t');
    let prefix = fields.next()?.trim().to_ascii_uppercase();
    let vendor = fields.next()?.trim();

    let is_hex = prefix.chars().all(|c| c.is_ascii_hexdigit());
    if prefix.len() != OUI_KEY_LEN || !is_hex || vendor.is_empty() {
        return None;
    }

    Some((prefix, vendor.to_string()))
}
