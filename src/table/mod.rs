mod auto_loader;
mod format;
pub mod json;
mod loader;

pub use auto_loader::{AutoTableLoader, DEFAULT_UPDATE_INTERVAL};
pub use format::{TableFormat, IANA_TLD_URL};
pub use json::{table_from_json, table_to_json, StateData, TableData};
pub use loader::{
    build_from_entries, BuiltinTableLoader, FileTableLoader, MemoryTableLoader, TableLoader,
};
