//! TLD DFA - table-driven top-level domain classification
//!
//! This library decides whether a domain suffix is a recognized TLD and
//! whether it is acceptable for host names, mail addresses, both or neither:
//! - Dense transition table with O(1) lookup per character
//! - Single left-to-right pass, no backtracking, no allocation
//! - Construction-time validation of untrusted tables
//! - TLD list compilation (IANA format) and JSON table import/export
//! - Embedded default table plus reloadable shared handle
//!
//! # Example
//!
//! ```rust
//! use tld_dfa::{AcceptSet, Classification, Rejection, Usage};
//!
//! // Embedded IANA snapshot plus local pseudo-TLDs
//! assert!(tld_dfa::is_mail_tld("com"));
//! assert!(tld_dfa::is_host_tld("fw"));
//! assert!(!tld_dfa::is_mail_tld("fw"));
//!
//! let result = tld_dfa::classify("ORG");
//! assert!(result.accepts(Usage::Host));
//! assert_eq!(result.flags(), AcceptSet::ALL);
//!
//! match tld_dfa::classify("co!m") {
//!     Classification::Rejected(Rejection::InvalidCharacter { position, .. }) => {
//!         assert_eq!(position, 2)
//!     }
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```
//!
//! # TLD list syntax
//!
//! ```text
//! # IANA list lines: one label, accepted for host and mail use
//! COM
//! MUSEUM
//! XN--P1AI      # IDN labels are skipped
//! # optional usage column
//! fw   host
//! lan  host,mail
//! ```

pub mod builtin;
pub mod dfa;
pub mod error;
pub mod parser;
pub mod shared;
pub mod table;
pub mod types;

// Re-export commonly used items
pub use builtin::{builtin, classify, is_host_tld, is_mail_tld, PSEUDO_TLDS};
pub use dfa::{Alphabet, Automaton, CaseFolding, Edge, State, Token, TrieBuilder};
pub use error::{Result, TableErrorKind, TldError};
pub use parser::{parse_accept_set, parse_tld_list, parse_tld_list_from_file, TldEntry};
pub use shared::SharedAutomaton;
pub use table::{
    AutoTableLoader, BuiltinTableLoader, FileTableLoader, MemoryTableLoader, TableFormat,
    TableLoader,
};
pub use types::{AcceptSet, Classification, Rejection, StateId, Usage};
