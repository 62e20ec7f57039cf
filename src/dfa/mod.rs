//! Table-driven TLD automaton.
//!
//! ## Example
//!
//! ```
//! use tld_dfa::dfa::TrieBuilder;
//! use tld_dfa::AcceptSet;
//!
//! let mut builder = TrieBuilder::new();
//! builder.add("com", AcceptSet::ALL).unwrap();
//! builder.add("fw", AcceptSet::HOST).unwrap();
//! let dfa = builder.build().unwrap();
//!
//! assert!(dfa.classify("com").is_mail());
//! assert!(dfa.classify("FW").is_host());
//! assert!(!dfa.classify("fw").is_mail());
//! assert!(dfa.classify("co!m").is_rejected());
//! ```

mod alphabet;
mod automaton;
mod trie;

pub use alphabet::{Alphabet, CaseFolding, Token, MAX_SYMBOLS};
pub use automaton::{Automaton, AutomatonStats, Edge, State, MAX_LANGUAGE_SIZE};
pub use trie::TrieBuilder;
