//! Typed G-code line model

use serde::{Deserialize, Serialize};

use crate::fill::FillType;

/// Classification of one line of the motion protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// `G`-word line carrying motion/extrusion parameters
    Motion,
    /// Comment-only line
    Comment,
    /// Any other machine word (`M`, `T`, ...)
    Other,
}

/// Leading command word of a line, e.g. `G1` or `M104`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcodeWord {
    /// Command letter, uppercased
    pub letter: char,
    /// Command number
    pub number: i32,
}

/// One `letter`/`value` parameter. Letters are unique within a line; a
/// parameter that is absent from a line simply has no entry (lookup returns
/// `None`, never a domain-valid default).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GcodeParam {
    /// Parameter letter, uppercased
    pub letter: char,
    /// Numeric value
    pub value: f64,
}

/// Structured metadata extracted from a line's comment text, parsed once at
/// the line boundary so consumers never re-scan free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineAnnotation {
    /// Comment marks a layer boundary (`"layer"` without `"feature"`)
    pub layer_boundary: bool,
    /// `"Fill Type <int>"` tag, if present
    pub fill_type: Option<FillType>,
    /// `W<w>` bead width from a `"tool"` comment, if present
    pub tool_width_mm: Option<f64>,
    /// `H<h>` bead height from a `"tool"` comment, if present
    pub tool_height_mm: Option<f64>,
}

impl LineAnnotation {
    /// Extract structured metadata from comment text.
    pub fn from_comment(comment: &str) -> Self {
        let mut annotation = Self {
            layer_boundary: comment.contains("layer") && !comment.contains("feature"),
            ..Self::default()
        };

        if let Some(index) = comment.find("Fill Type") {
            let rest = &comment[index + "Fill Type".len()..];
            if let Some(code) = rest.split_whitespace().next() {
                if let Ok(code) = code.parse::<i32>() {
                    annotation.fill_type = Some(FillType::from_code(code));
                }
            }
        }

        if comment.contains("tool") {
            for word in comment.split_whitespace() {
                if let Some(index) = word.find('W') {
                    if let Ok(width) = word[index + 1..].parse::<f64>() {
                        annotation.tool_width_mm = Some(width);
                    }
                }
                if let Some(index) = word.find('H') {
                    if let Ok(height) = word[index + 1..].parse::<f64>() {
                        annotation.tool_height_mm = Some(height);
                    }
                }
            }
        }

        annotation
    }
}

/// One parsed line of the command stream. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcodeLine {
    /// Line classification
    pub kind: LineKind,
    /// Leading command word (absent for comment lines)
    pub command: Option<GcodeWord>,
    /// Ordered parameter list; letters unique within the line
    pub parameters: Vec<GcodeParam>,
    /// Free-text comment, if any
    pub comment: Option<String>,
    /// Structured comment metadata
    pub annotation: LineAnnotation,
    /// 1-based source line number
    pub line_number: u32,
}

impl GcodeLine {
    /// Build a comment-only line.
    pub fn comment(text: impl Into<String>, line_number: u32) -> Self {
        let text = text.into();
        let annotation = LineAnnotation::from_comment(&text);
        Self {
            kind: LineKind::Comment,
            command: None,
            parameters: Vec::new(),
            comment: Some(text),
            annotation,
            line_number,
        }
    }

    /// Look up a parameter value by letter.
    pub fn param_value(&self, letter: char) -> Option<f64> {
        self.parameters
            .iter()
            .find(|p| p.letter == letter)
            .map(|p| p.value)
    }

    /// True for `G`-word lines.
    pub fn is_motion(&self) -> bool {
        self.kind == LineKind::Motion
    }
}

/// A parsed G-code document: an ordered sequence of command lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GcodeFile {
    /// All lines in stream order
    pub lines: Vec<GcodeLine>,
}

impl GcodeFile {
    /// Iterate all lines in stream order.
    pub fn lines(&self) -> impl Iterator<Item = &GcodeLine> {
        self.lines.iter()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the document has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
