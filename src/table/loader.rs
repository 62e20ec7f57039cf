use std::fs;
use std::path::{Path, PathBuf};

use crate::builtin;
use crate::dfa::{Automaton, CaseFolding, TrieBuilder};
use crate::error::{Result, TableErrorKind, TldError};
use crate::parser::{parse_tld_list, TldEntry};

use super::format::TableFormat;
use super::json::table_from_json;

/// Trait for loading TLD automata
pub trait TableLoader: Send + Sync {
    /// Load and validate an automaton
    fn load(&self) -> Result<Automaton>;
}

/// Compile TLD entries into an automaton
pub fn build_from_entries<'a>(
    entries: impl IntoIterator<Item = &'a TldEntry>,
    folding: CaseFolding,
) -> Result<Automaton> {
    let mut builder = TrieBuilder::new().with_case_folding(folding);
    builder.extend(entries)?;
    builder.build()
}

/// File-based loader with format auto-detection
#[derive(Debug, Clone, Default)]
pub struct FileTableLoader {
    path: Option<PathBuf>,
    format: Option<TableFormat>,
    folding: CaseFolding,
    extra: Vec<TldEntry>,
}

impl FileTableLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table file path
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set explicit format (overrides auto-detection)
    pub fn with_format(mut self, format: TableFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the case policy used when compiling a TLD list
    pub fn with_case_folding(mut self, folding: CaseFolding) -> Self {
        self.folding = folding;
        self
    }

    /// Add entries compiled alongside a TLD list (e.g. local pseudo-TLDs)
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = TldEntry>) -> Self {
        self.extra.extend(entries);
        self
    }

    /// Get format (explicit or detected from path)
    fn get_format(&self) -> Option<TableFormat> {
        self.format
            .or_else(|| self.path.as_ref().and_then(TableFormat::detect))
    }
}

impl TableLoader for FileTableLoader {
    fn load(&self) -> Result<Automaton> {
        let path = self.path.as_ref().ok_or_else(|| {
            TldError::table(TableErrorKind::NotConfigured, "table path not configured")
        })?;
        let format = self.get_format().ok_or_else(|| {
            TldError::table(
                TableErrorKind::NotConfigured,
                format!("cannot detect table format of '{}'", path.display()),
            )
        })?;

        let text = fs::read_to_string(path).map_err(|e| {
            TldError::table(
                TableErrorKind::FileError,
                format!("failed to read '{}': {}", path.display(), e),
            )
        })?;

        let automaton = match format {
            TableFormat::List => {
                let entries = parse_tld_list(&text)?;
                build_from_entries(entries.iter().chain(self.extra.iter()), self.folding)?
            }
            TableFormat::Json => {
                if !self.extra.is_empty() {
                    log::warn!(
                        "Ignoring {} extra TLD entries for prebuilt table '{}'",
                        self.extra.len(),
                        path.display()
                    );
                }
                table_from_json(&text)?
            }
        };

        log::info!(
            "Loaded TLD table '{}' ({} states)",
            path.display(),
            automaton.len()
        );
        Ok(automaton)
    }
}

/// Loader for a TLD list held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryTableLoader {
    entries: Vec<TldEntry>,
    folding: CaseFolding,
}

impl MemoryTableLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(mut self, entries: impl IntoIterator<Item = TldEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    pub fn with_case_folding(mut self, folding: CaseFolding) -> Self {
        self.folding = folding;
        self
    }
}

impl TableLoader for MemoryTableLoader {
    fn load(&self) -> Result<Automaton> {
        build_from_entries(&self.entries, self.folding)
    }
}

/// Loader returning the embedded table
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTableLoader;

impl TableLoader for BuiltinTableLoader {
    fn load(&self) -> Result<Automaton> {
        Ok(builtin::builtin().clone())
    }
}

/// Check that a file parses and compiles in the given format
pub(crate) fn verify_table_file(path: &Path, format: TableFormat) -> Result<()> {
    let automaton = FileTableLoader::new()
        .with_path(path)
        .with_format(format)
        .load()?;
    if automaton.stats().accepting == 0 {
        return Err(TldError::table(
            TableErrorKind::InvalidData,
            format!("'{}' contains no TLDs", path.display()),
        ));
    }
    Ok(())
}
