use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;

use crate::dfa::{Automaton, CaseFolding};
use crate::error::{Result, TableErrorKind, TldError};
use crate::parser::TldEntry;

use super::format::{TableFormat, IANA_TLD_URL};
use super::loader::{verify_table_file, FileTableLoader, TableLoader};

/// Logger callback type for logging list updates
type LoggerCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Default update interval: 7 days
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Loader that keeps a local copy of the IANA TLD list up to date
pub struct AutoTableLoader {
    data_dir: Option<PathBuf>,
    url: String,
    update_interval: Duration,
    folding: CaseFolding,
    extra: Vec<TldEntry>,
    logger: Option<LoggerCallback>,
    download_lock: Mutex<()>,
}

impl AutoTableLoader {
    pub fn new() -> Self {
        Self {
            data_dir: None,
            url: IANA_TLD_URL.to_string(),
            update_interval: DEFAULT_UPDATE_INTERVAL,
            folding: CaseFolding::default(),
            extra: Vec::new(),
            logger: None,
            download_lock: Mutex::new(()),
        }
    }

    /// Set directory holding the downloaded list
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set custom download URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set update interval
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    pub fn with_case_folding(mut self, folding: CaseFolding) -> Self {
        self.folding = folding;
        self
    }

    /// Add entries compiled alongside the downloaded list
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = TldEntry>) -> Self {
        self.extra.extend(entries);
        self
    }

    /// Set logger
    pub fn with_logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.logger = Some(Box::new(logger));
        self
    }

    fn log(&self, msg: &str) {
        log::info!("{}", msg);
        if let Some(ref logger) = self.logger {
            logger(msg);
        }
    }

    /// Path of the local list
    pub fn list_path(&self) -> PathBuf {
        let filename = TableFormat::List.default_filename();
        match self.data_dir {
            Some(ref dir) => dir.join(filename),
            None => PathBuf::from(filename),
        }
    }

    /// Check if file needs download
    fn should_download(&self, path: &Path) -> bool {
        match fs::metadata(path) {
            Ok(meta) => {
                if meta.len() == 0 {
                    return true;
                }
                match meta.modified() {
                    Ok(mtime) => SystemTime::now()
                        .duration_since(mtime)
                        .map(|d| d > self.update_interval)
                        .unwrap_or(true),
                    Err(_) => true,
                }
            }
            Err(_) => true,
        }
    }

    /// Download the list to `path`, verifying it before replacing the old copy
    fn download(&self, path: &Path) -> Result<()> {
        let _lock = self.download_lock.lock();

        // Double-check after acquiring lock
        if !self.should_download(path) {
            return Ok(());
        }

        self.log(&format!("Downloading {} from {}", path.display(), self.url));

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(TldError::IoError)?;
        }

        let tmp_path = path.with_extension("tmp");

        let response = ureq::get(self.url.as_str()).call().map_err(|e| {
            TldError::table(TableErrorKind::DownloadFailed, format!("Download failed: {}", e))
        })?;

        let (_, body) = response.into_parts();
        write_download(body.into_reader(), &tmp_path)?;

        if let Err(e) = verify_table_file(&tmp_path, TableFormat::List) {
            let _ = fs::remove_file(&tmp_path);
            return Err(TldError::table(
                TableErrorKind::DownloadFailed,
                format!("Verification failed: {}", e),
            ));
        }

        fs::rename(&tmp_path, path)?;

        self.log(&format!("Downloaded {} successfully", path.display()));
        Ok(())
    }

    /// Ensure the list is downloaded and available
    fn ensure_downloaded(&self) -> Result<PathBuf> {
        let path = self.list_path();

        if self.should_download(&path) {
            if let Err(e) = self.download(&path) {
                if !path.exists() {
                    return Err(e);
                }
                self.log(&format!("Download failed, using existing file: {}", e));
            }
        }

        Ok(path)
    }
}

/// Write a download body to `tmp_path`, removing the partial file on failure
fn write_download(mut reader: impl Read, tmp_path: &Path) -> Result<()> {
    let result = fs::File::create(tmp_path).and_then(|mut file| {
        std::io::copy(&mut reader, &mut file)?;
        file.flush()
    });
    if let Err(e) = result {
        let _ = fs::remove_file(tmp_path);
        return Err(TldError::IoError(e));
    }
    Ok(())
}

impl Default for AutoTableLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TableLoader for AutoTableLoader {
    fn load(&self) -> Result<Automaton> {
        let path = self.ensure_downloaded()?;
        FileTableLoader::new()
            .with_path(path)
            .with_format(TableFormat::List)
            .with_case_folding(self.folding)
            .with_entries(self.extra.iter().cloned())
            .load()
    }
}
