//! Strict parser for the four-block provider response:
//!
//! ```text
//! Topic: <name>
//!
//! Q: <question>
//!
//! A: <answer>
//!
//! Reference: <link>
//! ```
//!
//! Blocks are separated by blank (whitespace-only) lines and must appear in
//! exactly this order, each starting with its label. Anything else is a
//! `ParseError`; no partial structure is ever returned.

use thiserror::Error;

pub const TOPIC_LABEL: &str = "Topic:";
pub const QUESTION_LABEL: &str = "Q:";
pub const ANSWER_LABEL: &str = "A:";
pub const REFERENCE_LABEL: &str = "Reference:";

const LABELS: [&str; 4] = [TOPIC_LABEL, QUESTION_LABEL, ANSWER_LABEL, REFERENCE_LABEL];

/// How much of an offending block to echo back in an error.
const PREVIEW_CHARS: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("response is missing the '{label}' block")]
    MissingBlock { label: &'static str },

    #[error("expected a block starting with '{expected}', found '{found}'")]
    MissingLabel {
        expected: &'static str,
        found: String,
    },

    #[error("the '{label}' block is empty")]
    EmptyField { label: &'static str },

    #[error("unexpected extra block at position {index}")]
    UnexpectedBlock { index: usize },
}

/// Field values extracted from one well-formed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub topic: String,
    pub question: String,
    pub answer: String,
    pub reference: String,
}

pub fn parse_content_block(raw: &str) -> Result<ContentBlock, ParseError> {
    let blocks = split_blocks(raw);

    let field = |index: usize| -> Result<String, ParseError> {
        let label = LABELS[index];
        let block = blocks.get(index).ok_or(ParseError::MissingBlock { label })?;
        strip_label(block, label)
    };

    let parsed = ContentBlock {
        topic: field(0)?,
        question: field(1)?,
        answer: field(2)?,
        reference: field(3)?,
    };

    if blocks.len() > LABELS.len() {
        return Err(ParseError::UnexpectedBlock {
            index: LABELS.len(),
        });
    }
    Ok(parsed)
}

/// Groups consecutive non-blank lines; blank lines are separators.
fn split_blocks(raw: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in raw.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}

fn strip_label(block: &str, label: &'static str) -> Result<String, ParseError> {
    let value = block
        .trim_start()
        .strip_prefix(label)
        .ok_or_else(|| ParseError::MissingLabel {
            expected: label,
            found: block.trim().chars().take(PREVIEW_CHARS).collect(),
        })?
        .trim();

    if value.is_empty() {
        return Err(ParseError::EmptyField { label });
    }
    Ok(value.to_string())
}
