//! JSON transition table format.
//!
//! Mirrors the layout of a generated C table: one flag byte per state
//! (MAIL = 1, HOST = 2) and one transition per token, `-1` for reject.
//!
//! ```json
//! {
//!   "case_folding": "ascii_insensitive",
//!   "tokens": "ot",
//!   "states": [
//!     { "flags": 0, "transitions": [1, 2] },
//!     { "flags": 1, "transitions": [-1, -1] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::dfa::{Alphabet, Automaton, CaseFolding, Edge, State};
use crate::error::{Result, TldError};
use crate::types::{AcceptSet, StateId};

/// Raw transition value meaning "no transition"
pub const REJECT: i64 = -1;

/// Serialized transition table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    #[serde(default)]
    pub case_folding: CaseFolding,
    /// Alphabet symbols; the i-th character is token i
    pub tokens: String,
    pub states: Vec<StateData>,
}

/// Serialized state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateData {
    #[serde(default)]
    pub flags: u8,
    pub transitions: Vec<i64>,
}

impl TableData {
    pub fn from_automaton(automaton: &Automaton) -> Self {
        let states = automaton
            .states()
            .iter()
            .map(|state| StateData {
                flags: state.accept().to_wire(),
                transitions: state
                    .edges()
                    .iter()
                    .map(|edge| match edge {
                        Edge::Reject => REJECT,
                        Edge::To(id) => id.index() as i64,
                    })
                    .collect(),
            })
            .collect();

        Self {
            case_folding: automaton.alphabet().folding(),
            tokens: automaton.alphabet().symbols().collect(),
            states,
        }
    }

    /// Validate and convert into an automaton
    pub fn into_automaton(self) -> Result<Automaton> {
        let symbols: Vec<char> = self.tokens.chars().collect();
        let alphabet = Alphabet::new(&symbols, self.case_folding)?;
        let len = self.states.len();

        let states = self
            .states
            .into_iter()
            .enumerate()
            .map(|(index, data)| -> Result<State> {
                let accept = AcceptSet::from_wire(data.flags).ok_or(TldError::InvalidFlags {
                    state: index,
                    flags: data.flags,
                })?;
                let edges = data
                    .transitions
                    .iter()
                    .enumerate()
                    .map(|(token, &value)| decode_edge(index, token, value, len))
                    .collect::<Result<Vec<_>>>()?;
                Ok(State::new(accept, edges))
            })
            .collect::<Result<Vec<_>>>()?;

        Automaton::new(alphabet, states)
    }
}

fn decode_edge(state: usize, token: usize, value: i64, len: usize) -> Result<Edge> {
    if value == REJECT {
        return Ok(Edge::Reject);
    }
    if value < 0 {
        return Err(TldError::InvalidTransition {
            state,
            token,
            value,
        });
    }
    if value as u64 >= len as u64 {
        return Err(TldError::TransitionOutOfRange {
            state,
            token,
            target: value as usize,
            len,
        });
    }
    Ok(Edge::To(StateId(value as u32)))
}

/// Load an automaton from a JSON table
pub fn table_from_json(text: &str) -> Result<Automaton> {
    let data: TableData = serde_json::from_str(text)?;
    data.into_automaton()
}

/// Serialize an automaton as a JSON table
pub fn table_to_json(automaton: &Automaton) -> Result<String> {
    Ok(serde_json::to_string(&TableData::from_automaton(automaton))?)
}
