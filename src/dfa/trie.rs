//! Builds an [`Automaton`] from a list of TLD labels.
//!
//! Labels are inserted into a byte trie. On build, childless states that
//! accept the same usage set collapse into one state, tokens are assigned in
//! order of first appearance over the sorted labels, and states are numbered
//! in depth-first pre-order so the start state is always 0.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, TldError};
use crate::parser::TldEntry;
use crate::types::{AcceptSet, StateId};

use super::alphabet::{is_label_byte, Alphabet, CaseFolding};
use super::automaton::{Automaton, Edge, State};

#[derive(Debug, Clone, Default)]
struct Node {
    accept: AcceptSet,
    children: BTreeMap<u8, usize>,
}

/// Incremental builder for TLD automata
#[derive(Debug, Clone)]
pub struct TrieBuilder {
    folding: CaseFolding,
    nodes: Vec<Node>,
    labels: usize,
}

impl Default for TrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrieBuilder {
    pub fn new() -> Self {
        Self {
            folding: CaseFolding::default(),
            nodes: vec![Node::default()],
            labels: 0,
        }
    }

    /// Set the case policy of the resulting alphabet.
    ///
    /// Must be called before adding labels; labels are folded on insertion.
    pub fn with_case_folding(mut self, folding: CaseFolding) -> Self {
        self.folding = folding;
        self
    }

    /// Add a label. Adding the same label twice merges the usage sets.
    pub fn add(&mut self, label: &str, accept: AcceptSet) -> Result<()> {
        if label.is_empty() || !label.bytes().all(is_label_byte) {
            return Err(TldError::InvalidLabel(label.to_string()));
        }
        if accept.is_empty() {
            return Err(TldError::InvalidUsage(format!(
                "label '{}' has no usage classes",
                label
            )));
        }

        let mut node = 0;
        for byte in label.bytes() {
            let byte = self.folding.fold(byte);
            let existing = self.nodes[node].children.get(&byte).copied();
            node = match existing {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children.insert(byte, child);
                    child
                }
            };
        }

        if self.nodes[node].accept.is_empty() {
            self.labels += 1;
        }
        self.nodes[node].accept = self.nodes[node].accept.union(accept);
        Ok(())
    }

    /// Add every entry of a parsed TLD list
    pub fn extend<'a>(&mut self, entries: impl IntoIterator<Item = &'a TldEntry>) -> Result<()> {
        for entry in entries {
            self.add(&entry.label, entry.accept)?;
        }
        Ok(())
    }

    /// Number of distinct labels
    pub fn len(&self) -> usize {
        self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.labels == 0
    }

    /// All labels in byte order with their usage sets
    fn sorted_labels(&self) -> Vec<(Vec<u8>, AcceptSet)> {
        let mut labels = Vec::with_capacity(self.labels);
        let mut stack = vec![(0usize, Vec::new())];

        while let Some((node, prefix)) = stack.pop() {
            let n = &self.nodes[node];
            if !n.accept.is_empty() {
                labels.push((prefix.clone(), n.accept));
            }
            for (&byte, &child) in n.children.iter().rev() {
                let mut label = prefix.clone();
                label.push(byte);
                stack.push((child, label));
            }
        }

        labels
    }

    fn alphabet(&self) -> Result<Alphabet> {
        let mut seen = [false; 256];
        let mut symbols = Vec::new();
        for (label, _) in self.sorted_labels() {
            for byte in label {
                if !seen[byte as usize] {
                    seen[byte as usize] = true;
                    symbols.push(byte as char);
                }
            }
        }
        Alphabet::new(&symbols, self.folding)
    }

    /// Build the automaton
    pub fn build(&self) -> Result<Automaton> {
        if self.nodes.len() > u32::MAX as usize {
            return Err(TldError::TooManyStates(self.nodes.len()));
        }

        let alphabet = self.alphabet()?;

        // Pre-order numbering; leaves with equal accept sets share a state.
        let mut id_of: Vec<Option<StateId>> = vec![None; self.nodes.len()];
        let mut order: Vec<usize> = Vec::new();
        let mut leaf_ids: HashMap<AcceptSet, StateId> = HashMap::new();
        let mut stack = vec![0usize];

        while let Some(node) = stack.pop() {
            let n = &self.nodes[node];
            if node != 0 && n.children.is_empty() {
                let next = StateId(order.len() as u32);
                let id = *leaf_ids.entry(n.accept).or_insert_with(|| {
                    order.push(node);
                    next
                });
                id_of[node] = Some(id);
                continue;
            }

            id_of[node] = Some(StateId(order.len() as u32));
            order.push(node);
            for &child in n.children.values().rev() {
                stack.push(child);
            }
        }

        let states = order
            .iter()
            .map(|&node| -> Result<State> {
                let n = &self.nodes[node];
                let mut edges = vec![Edge::Reject; alphabet.len()];
                for (&byte, &child) in &n.children {
                    let token = alphabet
                        .token_of_byte(byte)
                        .ok_or(TldError::InvalidSymbol(byte as char))?;
                    let target = id_of[child].ok_or_else(|| {
                        TldError::ParseError(format!("trie node {} was not numbered", child))
                    })?;
                    edges[token.index()] = Edge::To(target);
                }
                Ok(State::new(n.accept, edges))
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Built TLD automaton: {} labels, {} trie nodes, {} states, {} tokens",
            self.labels,
            self.nodes.len(),
            states.len(),
            alphabet.len()
        );

        Automaton::new(alphabet, states)
    }
}
