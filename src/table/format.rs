use std::path::Path;

/// Default source of the IANA TLD list
pub const IANA_TLD_URL: &str = "https://data.iana.org/TLD/tlds-alpha-by-domain.txt";

/// Transition table file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Plain TLD list (IANA `tlds-alpha-by-domain.txt`, optional usage column)
    List,
    /// Prebuilt transition table (JSON)
    Json,
}

impl TableFormat {
    /// Detect format from file extension
    pub fn detect(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "txt" | "list" => Some(TableFormat::List),
            "json" => Some(TableFormat::Json),
            _ => None,
        }
    }

    /// Get default filename for this format
    pub fn default_filename(&self) -> &'static str {
        match self {
            TableFormat::List => "tlds-alpha-by-domain.txt",
            TableFormat::Json => "tld-table.json",
        }
    }
}
