use std::sync::Arc;

use parking_lot::RwLock;

use crate::dfa::Automaton;
use crate::error::Result;
use crate::table::TableLoader;
use crate::types::Classification;

/// Reloadable handle to the current TLD automaton.
///
/// Readers take an `Arc` snapshot; a reload builds a complete new automaton
/// before publishing it, so classification never observes a partial table.
pub struct SharedAutomaton {
    current: RwLock<Arc<Automaton>>,
}

impl SharedAutomaton {
    pub fn new(automaton: Automaton) -> Self {
        Self {
            current: RwLock::new(Arc::new(automaton)),
        }
    }

    /// Create a handle from a loader
    pub fn load(loader: &dyn TableLoader) -> Result<Self> {
        Ok(Self::new(loader.load()?))
    }

    /// Snapshot of the current automaton
    pub fn current(&self) -> Arc<Automaton> {
        self.current.read().clone()
    }

    /// Publish a new automaton, returning the previous one
    pub fn replace(&self, automaton: Automaton) -> Arc<Automaton> {
        let new = Arc::new(automaton);
        std::mem::replace(&mut *self.current.write(), new)
    }

    /// Reload from a loader. On failure the current automaton stays in place.
    pub fn reload(&self, loader: &dyn TableLoader) -> Result<()> {
        let automaton = loader.load()?;
        let states = automaton.len();
        self.replace(automaton);
        log::info!("Reloaded TLD automaton ({} states)", states);
        Ok(())
    }

    pub fn classify(&self, candidate: &str) -> Classification {
        self.current.read().classify(candidate)
    }

    pub fn is_host_tld(&self, candidate: &str) -> bool {
        self.classify(candidate).is_host()
    }

    pub fn is_mail_tld(&self, candidate: &str) -> bool {
        self.classify(candidate).is_mail()
    }
}
