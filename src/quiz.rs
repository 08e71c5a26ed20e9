//! Climate quiz prompt and the lenient parser for the generator's reply.
//!
//! The generator is asked for blocks of the form
//!
//! ```text
//! Q: Question text?
//! a) Option A
//! b) Option B
//! c) Option C
//! d) Option D
//! Answer: c
//! ```
//!
//! Its output is not guaranteed to follow that shape, so parsing never fails:
//! short blocks produce partial records with an empty answer.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GaiaError, Result};

pub const QUIZ_PROMPT: &str = "Create 5 multiple-choice questions (MCQs) related to climate change and sustainability.
Format:
Q: Question text?
a) Option A
b) Option B
c) Option C
d) Option D
Answer: <correct_option_letter>";

const BLOCK_MARKER: &str = "Q: ";
const OPTION_COUNT: usize = 4;
const ANSWER_LINE: usize = 1 + OPTION_COUNT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Lower-case option letter, or empty when the block had no answer line.
    pub answer: String,
}

/// A question as shown before the answer is revealed.
#[derive(Debug, Clone, Serialize)]
pub struct QuizPrompt<'a> {
    pub number: usize,
    pub question: &'a str,
    pub options: &'a [String],
}

impl QuizQuestion {
    /// Four options and an answer letter that points at one of them.
    pub fn is_well_formed(&self) -> bool {
        self.options.len() == OPTION_COUNT && answer_index(&self.answer).is_ok()
    }

    /// The option the answer letter points at.
    pub fn correct_option(&self) -> Result<&str> {
        let idx = answer_index(&self.answer)?;
        self.options
            .get(idx)
            .map(String::as_str)
            .ok_or_else(|| GaiaError::MalformedGeneratorOutput {
                message: format!(
                    "answer '{}' points past the {} parsed options",
                    self.answer,
                    self.options.len()
                ),
            })
    }

    pub fn as_prompt(&self, number: usize) -> QuizPrompt<'_> {
        QuizPrompt {
            number,
            question: &self.question,
            options: &self.options,
        }
    }
}

/// Map an answer letter to an option position: `a` is 0, `d` is 3.
pub fn answer_index(letter: &str) -> Result<usize> {
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ 'a'..='d'), None) => Ok(c as usize - 'a' as usize),
        _ => Err(GaiaError::InvalidAnswerLetter {
            letter: letter.to_string(),
        }),
    }
}

/// Reduce decorated letters such as `(c)`, `c)` or `c.` to the bare letter.
fn normalize_answer(raw: &str) -> String {
    static LETTER_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\(?([a-z])[).]?$").expect("answer letter regex is valid"));
    let lowered = raw.trim().to_lowercase();
    match LETTER_RE.captures(&lowered) {
        Some(caps) => caps[1].to_string(),
        None => lowered,
    }
}

fn parse_block(block: &str) -> QuizQuestion {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let question = lines.first().copied().unwrap_or_default().to_string();
    let options = lines
        .iter()
        .skip(1)
        .take(OPTION_COUNT)
        .map(|l| l.to_string())
        .collect();
    let answer = lines
        .get(ANSWER_LINE)
        .and_then(|l| l.rsplit(':').next())
        .map(normalize_answer)
        .unwrap_or_default();

    QuizQuestion {
        question,
        options,
        answer,
    }
}

/// Parse generator output into quiz questions. Text before the first marker is ignored.
pub fn parse_quiz(raw: &str) -> Vec<QuizQuestion> {
    raw.split(BLOCK_MARKER)
        .skip(1)
        .map(parse_block)
        .inspect(|q| {
            if !q.is_well_formed() {
                warn!(
                    "Quiz block did not match the expected format: question={:?}, options={}, answer={:?}",
                    q.question,
                    q.options.len(),
                    q.answer
                );
            }
        })
        .collect()
}
