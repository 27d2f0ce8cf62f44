//! Text-to-model G-code parsing

use std::io::BufRead;

use tracing::debug;

use super::line::{GcodeFile, GcodeLine, GcodeParam, GcodeWord, LineAnnotation, LineKind};
use crate::error::Result;

/// Stateful G-code parser producing typed [`GcodeLine`] records.
///
/// The parser never aborts on a malformed line: unparseable words are
/// dropped (logged at debug level) and the stream walk continues, per the
/// propagation policy of the analyses built on top.
pub struct GcodeParser {
    next_line_number: u32,
}

impl GcodeParser {
    /// Create a new parser starting at line 1.
    pub fn new() -> Self {
        Self {
            next_line_number: 1,
        }
    }

    /// Parse one line of text into a [`GcodeLine`].
    pub fn parse_line(&mut self, text: &str) -> GcodeLine {
        let line_number = self.next_line_number;
        self.next_line_number += 1;

        let trimmed = text.trim();

        // split off the trailing comment
        let (code_part, comment) = match trimmed.find(';') {
            Some(index) => (
                trimmed[..index].trim(),
                Some(trimmed[index + 1..].trim().to_string()),
            ),
            None if trimmed.starts_with('(') => (
                "",
                Some(
                    trimmed
                        .trim_start_matches('(')
                        .trim_end_matches(')')
                        .trim()
                        .to_string(),
                ),
            ),
            None => (trimmed, None),
        };

        let annotation = comment
            .as_deref()
            .map(LineAnnotation::from_comment)
            .unwrap_or_default();

        if code_part.is_empty() {
            return GcodeLine {
                kind: LineKind::Comment,
                command: None,
                parameters: Vec::new(),
                comment,
                annotation,
                line_number,
            };
        }

        let mut words = code_part.split_whitespace();
        let command = words.next().and_then(|word| parse_word(word, line_number));

        let mut parameters: Vec<GcodeParam> = Vec::new();
        for word in words {
            let Some((letter, value)) = parse_param(word) else {
                debug!(line_number, word, "skipping unparseable parameter word");
                continue;
            };
            if parameters.iter().any(|p| p.letter == letter) {
                debug!(line_number, %letter, "duplicate parameter letter, keeping first");
                continue;
            }
            parameters.push(GcodeParam { letter, value });
        }

        let kind = match command {
            Some(word) if word.letter == 'G' => LineKind::Motion,
            _ => LineKind::Other,
        };

        GcodeLine {
            kind,
            command,
            parameters,
            comment,
            annotation,
            line_number,
        }
    }

    /// Parse a whole document from a string.
    pub fn parse_str(&mut self, text: &str) -> GcodeFile {
        GcodeFile {
            lines: text.lines().map(|line| self.parse_line(line)).collect(),
        }
    }

    /// Parse a whole document from a buffered reader.
    pub fn parse_reader<R: BufRead>(&mut self, reader: R) -> Result<GcodeFile> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(self.parse_line(&line?));
        }
        Ok(GcodeFile { lines })
    }
}

impl Default for GcodeParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_word(word: &str, line_number: u32) -> Option<GcodeWord> {
    let mut chars = word.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if !letter.is_ascii_alphabetic() {
        debug!(line_number, word, "skipping unparseable command word");
        return None;
    }
    // "G1.1"-style subcodes truncate to the integer part
    let digits = chars.as_str();
    let number = digits
        .split('.')
        .next()
        .and_then(|d| d.parse::<i32>().ok())
        .unwrap_or_else(|| {
            debug!(line_number, word, "command word has no number, using 0");
            0
        });
    Some(GcodeWord { letter, number })
}

fn parse_param(word: &str) -> Option<(char, f64)> {
    let mut chars = word.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if !letter.is_ascii_alphabetic() {
        return None;
    }
    let value = chars.as_str().parse::<f64>().ok()?;
    Some((letter, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::FillType;

    fn parse_one(text: &str) -> GcodeLine {
        GcodeParser::new().parse_line(text)
    }

    #[test]
    fn test_motion_line() {
        let line = parse_one("G1 X10.5 Y-20.3 E1.2 F1800");
        assert_eq!(line.kind, LineKind::Motion);
        assert_eq!(
            line.command,
            Some(GcodeWord {
                letter: 'G',
                number: 1
            })
        );
        assert_eq!(line.param_value('X'), Some(10.5));
        assert_eq!(line.param_value('Y'), Some(-20.3));
        assert_eq!(line.param_value('E'), Some(1.2));
        assert_eq!(line.param_value('F'), Some(1800.0));
    }

    #[test]
    fn test_machine_word_is_other() {
        let line = parse_one("M104 S210");
        assert_eq!(line.kind, LineKind::Other);
        assert_eq!(line.param_value('S'), Some(210.0));
    }

    #[test]
    fn test_comment_line() {
        let line = parse_one("; layer 2, Z = 0.4");
        assert_eq!(line.kind, LineKind::Comment);
        assert_eq!(line.comment.as_deref(), Some("layer 2, Z = 0.4"));
        assert!(line.annotation.layer_boundary);
    }

    #[test]
    fn test_trailing_comment() {
        let line = parse_one("G1 X1 Y2 E0.5 ; feature Fill Type 512");
        assert_eq!(line.kind, LineKind::Motion);
        assert_eq!(line.annotation.fill_type, Some(FillType::SparseInfill));
    }

    #[test]
    fn test_paren_comment_line() {
        let line = parse_one("(homing cycle)");
        assert_eq!(line.kind, LineKind::Comment);
        assert_eq!(line.comment.as_deref(), Some("homing cycle"));
    }

    #[test]
    fn test_blank_line() {
        let line = parse_one("   ");
        assert_eq!(line.kind, LineKind::Comment);
        assert_eq!(line.comment, None);
    }

    #[test]
    fn test_duplicate_parameter_keeps_first() {
        let line = parse_one("G1 X1 X2");
        assert_eq!(line.param_value('X'), Some(1.0));
        assert_eq!(line.parameters.len(), 1);
    }

    #[test]
    fn test_valueless_parameter_skipped() {
        let line = parse_one("G28 X Y");
        assert_eq!(line.param_value('X'), None);
        assert!(line.parameters.is_empty());
    }

    #[test]
    fn test_line_numbers_increment() {
        let mut parser = GcodeParser::new();
        let file = parser.parse_str("G1 X0 Y0\nG1 X1 Y1 E0.1");
        assert_eq!(file.lines[0].line_number, 1);
        assert_eq!(file.lines[1].line_number, 2);
    }
}
