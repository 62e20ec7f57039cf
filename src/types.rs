use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use crate::error::TldError;

/// Usage class a TLD may be accepted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Usage {
    /// Host names (user hosts, vhosts)
    Host,
    /// Mail addresses
    Mail,
}

impl Usage {
    /// Every usage class, in wire-bit order
    pub const ALL: [Usage; 2] = [Usage::Mail, Usage::Host];

    const fn bit(self) -> u8 {
        match self {
            Usage::Mail => 0x01,
            Usage::Host => 0x02,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Usage::Host => "host",
            Usage::Mail => "mail",
        }
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Usage {
    type Err = TldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "host" => Ok(Usage::Host),
            "mail" => Ok(Usage::Mail),
            other => Err(TldError::InvalidUsage(other.to_string())),
        }
    }
}

/// Set of usage classes an accepting state satisfies.
///
/// An empty set marks a non-accepting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AcceptSet(u8);

impl AcceptSet {
    pub const NONE: AcceptSet = AcceptSet(0);
    pub const MAIL: AcceptSet = AcceptSet(Usage::Mail.bit());
    pub const HOST: AcceptSet = AcceptSet(Usage::Host.bit());
    pub const ALL: AcceptSet = AcceptSet(Usage::Mail.bit() | Usage::Host.bit());

    /// Check whether the set contains a usage class
    pub fn contains(self, usage: Usage) -> bool {
        self.0 & usage.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, usage: Usage) {
        self.0 |= usage.bit();
    }

    pub fn union(self, other: AcceptSet) -> AcceptSet {
        AcceptSet(self.0 | other.0)
    }

    /// Iterate the usage classes in this set
    pub fn iter(self) -> impl Iterator<Item = Usage> {
        Usage::ALL.into_iter().filter(move |u| self.contains(*u))
    }

    /// Decode the flag byte used by serialized tables (MAIL = 1, HOST = 2).
    pub(crate) fn from_wire(bits: u8) -> Option<AcceptSet> {
        if bits & !AcceptSet::ALL.0 != 0 {
            return None;
        }
        Some(AcceptSet(bits))
    }

    pub(crate) fn to_wire(self) -> u8 {
        self.0
    }
}

impl From<Usage> for AcceptSet {
    fn from(usage: Usage) -> Self {
        AcceptSet(usage.bit())
    }
}

impl FromIterator<Usage> for AcceptSet {
    fn from_iter<I: IntoIterator<Item = Usage>>(iter: I) -> Self {
        let mut set = AcceptSet::NONE;
        for usage in iter {
            set.insert(usage);
        }
        set
    }
}

impl BitOr for AcceptSet {
    type Output = AcceptSet;

    fn bitor(self, rhs: AcceptSet) -> AcceptSet {
        self.union(rhs)
    }
}

impl fmt::Display for AcceptSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.iter().map(|u| u.name()).collect();
        f.write_str(&names.join("+"))
    }
}

/// Index of a state in an automaton. State 0 is the start state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) u32);

impl StateId {
    pub const START: StateId = StateId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a candidate was rejected during traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The character at `position` has no token in the alphabet
    InvalidCharacter { position: usize, character: char },
    /// The non-ASCII byte at `position` cannot start any symbol
    InvalidByte { position: usize, byte: u8 },
    /// `state` has no edge for the character at `position`
    NoTransition { position: usize, state: StateId },
}

impl Rejection {
    /// Index of the character that stopped traversal
    pub fn position(&self) -> usize {
        match self {
            Rejection::InvalidCharacter { position, .. } => *position,
            Rejection::InvalidByte { position, .. } => *position,
            Rejection::NoTransition { position, .. } => *position,
        }
    }
}

/// Outcome of walking a candidate through the automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Traversal stopped before the candidate was consumed
    Rejected(Rejection),
    /// Traversal consumed the candidate; the set may be empty (unclassified)
    Classified(AcceptSet),
}

impl Classification {
    /// Accept set of the final state, empty when rejected
    pub fn flags(&self) -> AcceptSet {
        match self {
            Classification::Rejected(_) => AcceptSet::NONE,
            Classification::Classified(set) => *set,
        }
    }

    pub fn accepts(&self, usage: Usage) -> bool {
        self.flags().contains(usage)
    }

    pub fn is_host(&self) -> bool {
        self.accepts(Usage::Host)
    }

    pub fn is_mail(&self) -> bool {
        self.accepts(Usage::Mail)
    }

    /// True when the candidate is accepted for at least one usage class
    pub fn is_accepted(&self) -> bool {
        !self.flags().is_empty()
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Classification::Rejected(_))
    }

    /// Fully consumed but ended in a state with no usage classes
    pub fn is_unclassified(&self) -> bool {
        matches!(self, Classification::Classified(set) if set.is_empty())
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Classification::Rejected(r) => Some(r),
            Classification::Classified(_) => None,
        }
    }
}
