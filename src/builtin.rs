//! Process-wide TLD table compiled from the embedded IANA list.
//!
//! Built once on first use and never mutated afterwards. Services that need
//! to pick up a newer list at runtime should use [`crate::SharedAutomaton`]
//! with a [`crate::table::TableLoader`] instead.

use once_cell::sync::Lazy;

use crate::dfa::{Automaton, CaseFolding};
use crate::error::Result;
use crate::parser::{parse_tld_list, TldEntry};
use crate::table::build_from_entries;
use crate::types::{AcceptSet, Classification};

/// Embedded snapshot of the root zone TLD list, in IANA list format
pub const IANA_TLD_LIST: &str = include_str!("../data/tlds-alpha-by-domain.txt");

/// Pseudo-TLDs used internally by the network's ircds
pub const PSEUDO_TLDS: &[(&str, AcceptSet)] = &[
    ("fw", AcceptSet::HOST),
    ("lan", AcceptSet::ALL),
    ("thc", AcceptSet::HOST),
];

static BUILTIN: Lazy<Automaton> = Lazy::new(|| {
    let entries = builtin_entries().expect("embedded TLD list is invalid");
    build_from_entries(&entries, CaseFolding::AsciiInsensitive)
        .expect("embedded TLD list does not compile")
});

/// Entries of the embedded list followed by the pseudo-TLDs
pub fn builtin_entries() -> Result<Vec<TldEntry>> {
    let mut entries = parse_tld_list(IANA_TLD_LIST)?;
    entries.extend(
        PSEUDO_TLDS
            .iter()
            .map(|&(label, accept)| TldEntry::new(label, accept)),
    );
    Ok(entries)
}

/// The embedded table
pub fn builtin() -> &'static Automaton {
    &BUILTIN
}

/// Classify a TLD label against the embedded table
pub fn classify(candidate: &str) -> Classification {
    BUILTIN.classify(candidate)
}

pub fn is_host_tld(candidate: &str) -> bool {
    BUILTIN.is_host_tld(candidate)
}

pub fn is_mail_tld(candidate: &str) -> bool {
    BUILTIN.is_mail_tld(candidate)
}
