//! Character to token mapping.
//!
//! Keeps the transition table dense: every state stores one edge per token,
//! and the token index is a direct array offset.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TldError};

/// Maximum number of distinct symbols (tokens are stored as `u8`)
pub const MAX_SYMBOLS: usize = 256;

/// Input symbol of the automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(u8);

impl Token {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Case policy of an alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseFolding {
    /// Only the stored case of each letter maps to a token
    Sensitive,
    /// Upper and lower case ASCII letters share a token
    #[default]
    AsciiInsensitive,
}

impl CaseFolding {
    pub(crate) fn fold(self, byte: u8) -> u8 {
        match self {
            CaseFolding::Sensitive => byte,
            CaseFolding::AsciiInsensitive => byte.to_ascii_lowercase(),
        }
    }
}

/// Check whether a byte may appear in a TLD label (letters, digits, hyphen)
pub(crate) fn is_label_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-'
}

/// Maps characters to tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    map: [Option<Token>; 256],
    symbols: Vec<u8>,
    folding: CaseFolding,
}

impl Alphabet {
    /// Create an alphabet; token `i` is assigned to `symbols[i]`.
    ///
    /// Under [`CaseFolding::AsciiInsensitive`] symbols are stored lowercased
    /// and both cases map to the same token.
    pub fn new(symbols: &[char], folding: CaseFolding) -> Result<Self> {
        if symbols.len() > MAX_SYMBOLS {
            return Err(TldError::TooManySymbols(symbols.len()));
        }

        let mut map = [None; 256];
        let mut stored = Vec::with_capacity(symbols.len());

        for (index, &ch) in symbols.iter().enumerate() {
            if !ch.is_ascii() || !is_label_byte(ch as u8) {
                return Err(TldError::InvalidSymbol(ch));
            }
            let byte = folding.fold(ch as u8);
            if map[byte as usize].is_some() {
                return Err(TldError::DuplicateSymbol(ch));
            }

            let token = Some(Token(index as u8));
            map[byte as usize] = token;
            if folding == CaseFolding::AsciiInsensitive {
                map[byte.to_ascii_uppercase() as usize] = token;
            }
            stored.push(byte);
        }

        Ok(Self {
            map,
            symbols: stored,
            folding,
        })
    }

    /// Token for a character, `None` if it can never appear in a TLD
    #[inline]
    pub fn token_of(&self, ch: char) -> Option<Token> {
        if ch.is_ascii() {
            self.map[ch as usize]
        } else {
            None
        }
    }

    #[inline]
    pub fn token_of_byte(&self, byte: u8) -> Option<Token> {
        self.map[byte as usize]
    }

    /// Symbol stored for a token
    pub fn symbol(&self, token: Token) -> Option<char> {
        self.symbols.get(token.index()).map(|&b| b as char)
    }

    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().map(|&b| b as char)
    }

    /// Number of tokens (the width of every transition row)
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn folding(&self) -> CaseFolding {
        self.folding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_follow_symbol_order() {
        let alphabet = Alphabet::new(&['c', 'o', 'm'], CaseFolding::Sensitive).unwrap();
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.token_of('c').map(Token::index), Some(0));
        assert_eq!(alphabet.token_of('o').map(Token::index), Some(1));
        assert_eq!(alphabet.token_of('m').map(Token::index), Some(2));
        assert_eq!(alphabet.token_of('x'), None);
    }

    #[test]
    fn test_case_sensitive_rejects_other_case() {
        let alphabet = Alphabet::new(&['a'], CaseFolding::Sensitive).unwrap();
        assert!(alphabet.token_of('a').is_some());
        assert!(alphabet.token_of('A').is_none());
    }

    #[test]
    fn test_case_folding_shares_token() {
        let alphabet = Alphabet::new(&['A', 'b'], CaseFolding::AsciiInsensitive).unwrap();
        assert_eq!(alphabet.token_of('a'), alphabet.token_of('A'));
        assert_eq!(alphabet.token_of('b'), alphabet.token_of('B'));
        assert_eq!(alphabet.symbols().collect::<String>(), "ab");
    }

    #[test]
    fn test_digits_and_hyphen_do_not_fold() {
        let alphabet = Alphabet::new(&['1', '-'], CaseFolding::AsciiInsensitive).unwrap();
        assert!(alphabet.token_of('1').is_some());
        assert!(alphabet.token_of('-').is_some());
        assert!(alphabet.token_of('!').is_none());
    }

    #[test]
    fn test_non_ascii_is_invalid() {
        let alphabet = Alphabet::new(&['e'], CaseFolding::AsciiInsensitive).unwrap();
        assert!(alphabet.token_of('é').is_none());
        assert!(alphabet.token_of_byte(0xC3).is_none());
    }

    #[test]
    fn test_rejects_bad_symbols() {
        assert!(matches!(
            Alphabet::new(&['.'], CaseFolding::Sensitive),
            Err(TldError::InvalidSymbol('.'))
        ));
        assert!(matches!(
            Alphabet::new(&['a', 'A'], CaseFolding::AsciiInsensitive),
            Err(TldError::DuplicateSymbol('A'))
        ));
        assert!(Alphabet::new(&['a', 'A'], CaseFolding::Sensitive).is_ok());
    }
}
