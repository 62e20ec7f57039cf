use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::error::{Result, TldError};
use crate::types::{AcceptSet, Usage};

/// Regex pattern for TLD list lines
/// Format: label[ usage[,usage]]
static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9-]+)(?:\s+([A-Za-z]+(?:\s*[,|]\s*[A-Za-z]+)*))?$")
        .expect("LINE_PATTERN: hardcoded regex is invalid")
});

/// Prefix of punycode-encoded (IDN) labels, which are never compiled in
const IDN_PREFIX: &str = "xn--";

/// A TLD list entry before compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TldEntry {
    /// Lowercased label
    pub label: String,
    /// Usage classes the label is accepted for
    pub accept: AcceptSet,
    /// Line number in the original text (0 for entries not read from text)
    pub line_num: usize,
}

impl TldEntry {
    pub fn new(label: impl Into<String>, accept: AcceptSet) -> Self {
        Self {
            label: label.into().to_lowercase(),
            accept,
            line_num: 0,
        }
    }
}

/// Parse a TLD list in the IANA `tlds-alpha-by-domain.txt` format.
///
/// `#` starts a comment. Labels without a usage column are accepted for both
/// host and mail use; `XN--` labels are skipped.
pub fn parse_tld_list(text: &str) -> Result<Vec<TldEntry>> {
    let mut entries = Vec::new();
    let mut skipped_idn = 0usize;

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1; // 1-based line numbers

        let line = if let Some(comment_pos) = line.find('#') {
            &line[..comment_pos]
        } else {
            line
        };
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        let captures = LINE_PATTERN
            .captures(line)
            .ok_or_else(|| TldError::ParseErrorAtLine {
                line: line_num,
                message: format!("Invalid TLD entry: {}", line),
            })?;

        let label = captures[1].to_lowercase();
        if label.starts_with(IDN_PREFIX) {
            skipped_idn += 1;
            continue;
        }

        let accept = match captures.get(2) {
            Some(m) => parse_accept_set(m.as_str()).map_err(|e| TldError::ParseErrorAtLine {
                line: line_num,
                message: e.to_string(),
            })?,
            None => AcceptSet::ALL,
        };

        entries.push(TldEntry {
            label,
            accept,
            line_num,
        });
    }

    if skipped_idn > 0 {
        log::debug!("Skipped {} IDN entries in TLD list", skipped_idn);
    }

    Ok(entries)
}

/// Parse a TLD list from a file.
pub fn parse_tld_list_from_file(path: impl AsRef<Path>) -> Result<Vec<TldEntry>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        TldError::ParseError(format!(
            "Failed to read TLD list '{}': {}",
            path.display(),
            e
        ))
    })?;
    parse_tld_list(&text)
}

/// Parse a usage specification
/// Examples: "host", "mail", "all", "host,mail", "host|mail"
pub fn parse_accept_set(spec: &str) -> Result<AcceptSet> {
    let mut set = AcceptSet::NONE;

    for part in spec.split([',', '|']) {
        let part = part.trim();
        if part.eq_ignore_ascii_case("all") || part.eq_ignore_ascii_case("both") {
            set = set.union(AcceptSet::ALL);
        } else {
            set.insert(part.parse::<Usage>()?);
        }
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iana_list() {
        let text = "# Version 2011010100, Last Updated Sat Jan  1 07:07:01 2011 UTC
COM
IT
MUSEUM
";
        let entries = parse_tld_list(text).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].label, "com");
        assert_eq!(entries[0].accept, AcceptSet::ALL);
        assert_eq!(entries[0].line_num, 2);
        assert_eq!(entries[2].label, "museum");
    }

    #[test]
    fn test_skip_idn_and_blank_lines() {
        let text = "\nXN--P1AI\n\nRU   # Russia\nxn--fiqs8s\n";
        let entries = parse_tld_list(text).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "ru");
        assert_eq!(entries[0].line_num, 4);
    }

    #[test]
    fn test_usage_column() {
        let text = "fw host\nlan all\nthc HOST\nmx mail, host\n";
        let entries = parse_tld_list(text).unwrap();
        assert_eq!(entries[0].accept, AcceptSet::HOST);
        assert_eq!(entries[1].accept, AcceptSet::ALL);
        assert_eq!(entries[2].accept, AcceptSet::HOST);
        assert_eq!(entries[3].accept, AcceptSet::ALL);
    }

    #[test]
    fn test_invalid_line() {
        let err = parse_tld_list("com\nco.uk\n").unwrap_err();
        match err {
            TldError::ParseErrorAtLine { line, .. } => assert_eq!(line, 2),
            other => panic!("expected ParseErrorAtLine, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_usage_reports_line() {
        let err = parse_tld_list("com\n\nlan smtp\n").unwrap_err();
        match err {
            TldError::ParseErrorAtLine { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("smtp"), "got: {}", message);
            }
            other => panic!("expected ParseErrorAtLine, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_accept_set() {
        assert_eq!(parse_accept_set("host").unwrap(), AcceptSet::HOST);
        assert_eq!(parse_accept_set("mail|host").unwrap(), AcceptSet::ALL);
        assert_eq!(parse_accept_set("both").unwrap(), AcceptSet::ALL);
        assert!(parse_accept_set("").is_err());
        assert!(parse_accept_set("host,").is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = parse_tld_list_from_file("/nonexistent/tlds.txt");
        assert!(matches!(result, Err(TldError::ParseError(_))));
    }

    #[test]
    fn test_line_pattern_compiles() {
        // Forces Lazy evaluation; if the pattern is invalid, this panics
        assert!(LINE_PATTERN.is_match("com"));
        assert!(LINE_PATTERN.is_match("lan host,mail"));
        assert!(!LINE_PATTERN.is_match("co uk ."));
    }
}
