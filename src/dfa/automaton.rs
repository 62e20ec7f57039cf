//! Table-driven TLD automaton.
//!
//! Each state holds one edge per alphabet token plus the set of usage
//! classes it accepts. Classification walks the candidate left to right with
//! one array lookup per character and stops at the first invalid character
//! or missing edge.

use crate::error::{Result, TldError};
use crate::types::{AcceptSet, Classification, Rejection, StateId};

use super::alphabet::{Alphabet, Token};

/// Upper bound on the number of labels [`Automaton::language`] enumerates
pub const MAX_LANGUAGE_SIZE: usize = 1 << 20;

/// Outgoing edge of a state for one token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Reject,
    To(StateId),
}

/// A single DFA state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    accept: AcceptSet,
    edges: Box<[Edge]>,
}

impl State {
    pub fn new(accept: AcceptSet, edges: Vec<Edge>) -> Self {
        Self {
            accept,
            edges: edges.into_boxed_slice(),
        }
    }

    pub fn accept(&self) -> AcceptSet {
        self.accept
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Check if this state has no outgoing edges
    pub fn is_leaf(&self) -> bool {
        self.edges.iter().all(|e| *e == Edge::Reject)
    }
}

/// Summary counts for an automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutomatonStats {
    pub states: usize,
    pub tokens: usize,
    pub accepting: usize,
    pub transitions: usize,
}

/// Immutable TLD classifier.
///
/// Validated on construction; never mutated afterwards, so a single instance
/// can be shared across threads by reference or `Arc`.
#[derive(Debug, Clone)]
pub struct Automaton {
    alphabet: Alphabet,
    states: Vec<State>,
}

impl Automaton {
    /// Create an automaton from an alphabet and its state table.
    ///
    /// Fails if the table is empty, a row's width differs from the alphabet
    /// size, or an edge targets a state that does not exist.
    pub fn new(alphabet: Alphabet, states: Vec<State>) -> Result<Self> {
        if states.is_empty() {
            return Err(TldError::EmptyTable);
        }
        if states.len() > u32::MAX as usize {
            return Err(TldError::TooManyStates(states.len()));
        }

        let width = alphabet.len();
        for (index, state) in states.iter().enumerate() {
            if state.edges.len() != width {
                return Err(TldError::TransitionCountMismatch {
                    state: index,
                    expected: width,
                    actual: state.edges.len(),
                });
            }
            for (token, edge) in state.edges.iter().enumerate() {
                if let Edge::To(target) = edge {
                    if target.index() >= states.len() {
                        return Err(TldError::TransitionOutOfRange {
                            state: index,
                            token,
                            target: target.index(),
                            len: states.len(),
                        });
                    }
                }
            }
        }

        let automaton = Self { alphabet, states };

        let reachable = automaton.reachable_count();
        if reachable < automaton.states.len() {
            log::warn!(
                "TLD automaton has {} unreachable states",
                automaton.states.len() - reachable
            );
        }
        if automaton.states.iter().all(|s| s.accept.is_empty()) {
            log::warn!("TLD automaton has no accepting states");
        }

        Ok(automaton)
    }

    /// Classify a candidate TLD label.
    pub fn classify(&self, candidate: &str) -> Classification {
        let mut state = StateId::START;
        for (position, character) in candidate.chars().enumerate() {
            let Some(token) = self.alphabet.token_of(character) else {
                return Classification::Rejected(Rejection::InvalidCharacter {
                    position,
                    character,
                });
            };
            match self.step(state, token) {
                Edge::To(next) => state = next,
                Edge::Reject => {
                    return Classification::Rejected(Rejection::NoTransition { position, state })
                }
            }
        }
        Classification::Classified(self.states[state.index()].accept)
    }

    /// Classify a candidate given as raw bytes; positions are byte offsets.
    ///
    /// A rejected non-ASCII byte is reported as [`Rejection::InvalidByte`]
    /// since it is not a character on its own.
    pub fn classify_bytes(&self, candidate: &[u8]) -> Classification {
        let mut state = StateId::START;
        for (position, &byte) in candidate.iter().enumerate() {
            let Some(token) = self.alphabet.token_of_byte(byte) else {
                let rejection = if byte.is_ascii() {
                    Rejection::InvalidCharacter {
                        position,
                        character: char::from(byte),
                    }
                } else {
                    Rejection::InvalidByte { position, byte }
                };
                return Classification::Rejected(rejection);
            };
            match self.step(state, token) {
                Edge::To(next) => state = next,
                Edge::Reject => {
                    return Classification::Rejected(Rejection::NoTransition { position, state })
                }
            }
        }
        Classification::Classified(self.states[state.index()].accept)
    }

    /// Classify the last label of a domain name.
    ///
    /// A single trailing dot (the DNS root) is ignored. The name is not
    /// otherwise checked.
    pub fn classify_domain(&self, name: &str) -> Classification {
        let name = name.strip_suffix('.').unwrap_or(name);
        let tld = match name.rsplit_once('.') {
            Some((_, tld)) => tld,
            None => name,
        };
        self.classify(tld)
    }

    pub fn is_host_tld(&self, candidate: &str) -> bool {
        self.classify(candidate).is_host()
    }

    pub fn is_mail_tld(&self, candidate: &str) -> bool {
        self.classify(candidate).is_mail()
    }

    #[inline]
    fn step(&self, state: StateId, token: Token) -> Edge {
        // Row width equals the alphabet size, checked in `new`.
        self.states[state.index()].edges[token.index()]
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.index())
    }

    /// Number of states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false: a valid automaton has at least the start state
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of states reachable from the start state
    pub fn reachable_count(&self) -> usize {
        let mut seen = vec![false; self.states.len()];
        let mut stack = vec![StateId::START];
        seen[0] = true;
        let mut count = 1;

        while let Some(id) = stack.pop() {
            for edge in self.states[id.index()].edges.iter() {
                if let Edge::To(next) = *edge {
                    if !seen[next.index()] {
                        seen[next.index()] = true;
                        count += 1;
                        stack.push(next);
                    }
                }
            }
        }

        count
    }

    pub fn stats(&self) -> AutomatonStats {
        AutomatonStats {
            states: self.states.len(),
            tokens: self.alphabet.len(),
            accepting: self.states.iter().filter(|s| !s.accept.is_empty()).count(),
            transitions: self
                .states
                .iter()
                .map(|s| s.edges.iter().filter(|e| matches!(e, Edge::To(_))).count())
                .sum(),
        }
    }

    /// Enumerate every accepted label with its usage set, sorted by label.
    ///
    /// Fails with [`TldError::CyclicTable`] if the table loops, since the
    /// language would be infinite, and with [`TldError::LanguageTooLarge`]
    /// if it holds more than [`MAX_LANGUAGE_SIZE`] labels.
    pub fn language(&self) -> Result<Vec<(String, AcceptSet)>> {
        let size = self.language_size()?;
        if size > MAX_LANGUAGE_SIZE {
            return Err(TldError::LanguageTooLarge {
                limit: MAX_LANGUAGE_SIZE,
            });
        }

        let mut labels = Vec::with_capacity(size);
        let mut stack = vec![(StateId::START, String::new())];

        while let Some((id, prefix)) = stack.pop() {
            let state = &self.states[id.index()];
            if !state.accept.is_empty() {
                labels.push((prefix.clone(), state.accept));
            }

            for (index, edge) in state.edges.iter().enumerate() {
                if let Edge::To(next) = *edge {
                    let mut label = prefix.clone();
                    label.extend(self.alphabet.symbols().nth(index));
                    stack.push((next, label));
                }
            }
        }

        labels.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(labels)
    }

    /// Count accepted labels without enumerating them.
    ///
    /// Post-order walk over the reachable states; each state's count is its
    /// own acceptance plus the counts behind its edges, saturating at
    /// `usize::MAX`. An edge back to a state still on the walk is a cycle.
    fn language_size(&self) -> Result<usize> {
        #[derive(Clone, Copy)]
        enum Mark {
            Unseen,
            Open,
            Done,
        }

        let mut marks = vec![Mark::Unseen; self.states.len()];
        let mut counts = vec![0usize; self.states.len()];
        // (state, next edge to visit)
        let mut stack = vec![(StateId::START, 0usize)];
        marks[StateId::START.index()] = Mark::Open;

        while let Some(&(id, edge)) = stack.last() {
            let state = &self.states[id.index()];
            if let Some(next_edge) = state.edges.get(edge) {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                if let Edge::To(next) = *next_edge {
                    match marks[next.index()] {
                        Mark::Open => return Err(TldError::CyclicTable(next.index())),
                        Mark::Unseen => {
                            marks[next.index()] = Mark::Open;
                            stack.push((next, 0));
                        }
                        Mark::Done => {}
                    }
                }
                continue;
            }

            stack.pop();
            let total = state
                .edges
                .iter()
                .filter_map(|e| match *e {
                    Edge::To(next) => Some(counts[next.index()]),
                    Edge::Reject => None,
                })
                .fold(usize::from(!state.accept.is_empty()), usize::saturating_add);
            counts[id.index()] = total;
            marks[id.index()] = Mark::Done;
        }

        Ok(counts[StateId::START.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dfa::alphabet::CaseFolding;
    use crate::types::Usage;

    // Accepts "co" (host) and "com" (host+mail); tokens c=0 o=1 m=2.
    fn small() -> Automaton {
        let alphabet = Alphabet::new(&['c', 'o', 'm'], CaseFolding::AsciiInsensitive).unwrap();
        let s = |n| Edge::To(StateId(n));
        let r = Edge::Reject;
        Automaton::new(
            alphabet,
            vec![
                State::new(AcceptSet::NONE, vec![s(1), r, r]),
                State::new(AcceptSet::NONE, vec![r, s(2), r]),
                State::new(AcceptSet::HOST, vec![r, r, s(3)]),
                State::new(AcceptSet::ALL, vec![r, r, r]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_classify_accepting() {
        let dfa = small();
        assert_eq!(dfa.classify("com"), Classification::Classified(AcceptSet::ALL));
        assert_eq!(dfa.classify("co"), Classification::Classified(AcceptSet::HOST));
        assert!(dfa.is_host_tld("co"));
        assert!(!dfa.is_mail_tld("co"));
    }

    #[test]
    fn test_prefix_is_unclassified() {
        let dfa = small();
        assert!(dfa.classify("c").is_unclassified());
        assert!(dfa.classify("").is_unclassified());
    }

    #[test]
    fn test_invalid_character_short_circuits() {
        let dfa = small();
        assert_eq!(
            dfa.classify("co!m"),
            Classification::Rejected(Rejection::InvalidCharacter {
                position: 2,
                character: '!'
            })
        );
    }

    #[test]
    fn test_missing_edge() {
        let dfa = small();
        assert_eq!(
            dfa.classify("comm"),
            Classification::Rejected(Rejection::NoTransition {
                position: 3,
                state: StateId(3)
            })
        );
        assert!(dfa.classify("o").is_rejected());
    }

    #[test]
    fn test_case_folded_input() {
        let dfa = small();
        assert_eq!(dfa.classify("COM"), dfa.classify("com"));
        assert_eq!(dfa.classify_bytes(b"CoM"), dfa.classify("com"));
    }

    #[test]
    fn test_classify_domain_uses_last_label() {
        let dfa = small();
        assert!(dfa.classify_domain("irc.example.com").is_mail());
        assert!(dfa.classify_domain("irc.example.com.").is_mail());
        assert!(dfa.classify_domain("host.co").is_host());
        assert!(dfa.classify_domain("com").is_host());
        assert!(dfa.classify_domain("example.org").is_rejected());
    }

    #[test]
    fn test_rejects_out_of_range_target() {
        let alphabet = Alphabet::new(&['a'], CaseFolding::Sensitive).unwrap();
        let err = Automaton::new(
            alphabet,
            vec![State::new(AcceptSet::NONE, vec![Edge::To(StateId(5))])],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TldError::TransitionOutOfRange {
                state: 0,
                token: 0,
                target: 5,
                len: 1
            }
        ));
    }

    #[test]
    fn test_rejects_short_row() {
        let alphabet = Alphabet::new(&['a', 'b'], CaseFolding::Sensitive).unwrap();
        let err =
            Automaton::new(alphabet, vec![State::new(AcceptSet::NONE, vec![Edge::Reject])])
                .unwrap_err();
        assert!(matches!(
            err,
            TldError::TransitionCountMismatch {
                state: 0,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_rejects_empty_table() {
        let alphabet = Alphabet::new(&[], CaseFolding::Sensitive).unwrap();
        assert!(matches!(
            Automaton::new(alphabet, Vec::new()),
            Err(TldError::EmptyTable)
        ));
    }

    #[test]
    fn test_language_and_stats() {
        let dfa = small();
        let language = dfa.language().unwrap();
        assert_eq!(
            language,
            vec![
                ("co".to_string(), AcceptSet::HOST),
                ("com".to_string(), AcceptSet::ALL)
            ]
        );

        let stats = dfa.stats();
        assert_eq!(stats.states, 4);
        assert_eq!(stats.tokens, 3);
        assert_eq!(stats.accepting, 2);
        assert_eq!(stats.transitions, 3);
        assert_eq!(dfa.reachable_count(), 4);
    }

    #[test]
    fn test_language_detects_cycle() {
        let alphabet = Alphabet::new(&['a'], CaseFolding::Sensitive).unwrap();
        let dfa = Automaton::new(
            alphabet,
            vec![State::new(AcceptSet::from(Usage::Host), vec![Edge::To(StateId(0))])],
        )
        .unwrap();
        assert!(dfa.classify("aaaa").is_host());
        assert!(matches!(dfa.language(), Err(TldError::CyclicTable(0))));
    }

    // State i sends both tokens to state i + 1; only the last state accepts.
    fn chain(len: u32) -> Automaton {
        let alphabet = Alphabet::new(&['a', 'b'], CaseFolding::Sensitive).unwrap();
        let mut states: Vec<State> = (1..len)
            .map(|next| {
                let edge = Edge::To(StateId(next));
                State::new(AcceptSet::NONE, vec![edge, edge])
            })
            .collect();
        states.push(State::new(AcceptSet::HOST, vec![Edge::Reject, Edge::Reject]));
        Automaton::new(alphabet, states).unwrap()
    }

    #[test]
    fn test_language_of_shared_states() {
        let dfa = chain(3);
        let labels: Vec<String> = dfa.language().unwrap().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["aa", "ab", "ba", "bb"]);
    }

    #[test]
    fn test_language_refuses_exponential_table() {
        // 2^39 accepted labels through 40 states
        let dfa = chain(40);
        assert!(dfa.classify(&format!("{}b", "ab".repeat(19))).is_host());
        assert!(matches!(
            dfa.language(),
            Err(TldError::LanguageTooLarge {
                limit: MAX_LANGUAGE_SIZE
            })
        ));
    }

    #[test]
    fn test_language_detects_cycle_behind_shared_state() {
        let alphabet = Alphabet::new(&['a', 'b'], CaseFolding::Sensitive).unwrap();
        let s = |n| Edge::To(StateId(n));
        let dfa = Automaton::new(
            alphabet,
            vec![
                State::new(AcceptSet::NONE, vec![s(1), s(1)]),
                State::new(AcceptSet::HOST, vec![s(2), Edge::Reject]),
                State::new(AcceptSet::NONE, vec![Edge::Reject, s(1)]),
            ],
        )
        .unwrap();
        assert!(matches!(dfa.language(), Err(TldError::CyclicTable(1))));
    }

    #[test]
    fn test_classify_bytes_reports_raw_byte() {
        let dfa = small();
        assert_eq!(
            dfa.classify_bytes(b"c\xC3\xB6m"),
            Classification::Rejected(Rejection::InvalidByte {
                position: 1,
                byte: 0xC3
            })
        );
        assert_eq!(
            dfa.classify_bytes(b"co!m"),
            Classification::Rejected(Rejection::InvalidCharacter {
                position: 2,
                character: '!'
            })
        );
    }
}
