//! Per-request accumulation of fragments into one ordered text stream.

use thiserror::Error;

use super::classifier::{Fragment, RunOutcome};

/// The run produced no usable text.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Empty response from cursor-agent")]
pub struct EmptyResponse;

/// How fragments leave the multiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Forward every fragment as soon as it arrives.
    Streaming,
    /// Hold everything back until [`ResponseMultiplexer::finish`].
    Batch,
}

/// Ordered accumulator for one request.
#[derive(Debug)]
pub struct ResponseMultiplexer {
    mode: Mode,
    timing_footer: bool,
    result_separator: &'static str,
    text: String,
    /// Assistant text only, for comparing against the outcome.
    answer: String,
    outcome: Option<RunOutcome>,
}

impl ResponseMultiplexer {
    pub const fn new(mode: Mode) -> Self {
        Self {
            mode,
            timing_footer: false,
            result_separator: "",
            text: String::new(),
            answer: String::new(),
            outcome: None,
        }
    }

    /// Append `⏱️  Completed in <ms>ms` to batch output when the run reports a
    /// duration.
    #[must_use]
    pub const fn with_timing_footer(mut self) -> Self {
        self.timing_footer = true;
        self
    }

    /// Put `separator` between the accumulated text and the outcome text.
    #[must_use]
    pub const fn with_result_separator(mut self, separator: &'static str) -> Self {
        self.result_separator = separator;
        self
    }

    /// Take one fragment. Returns the text to forward now, if any.
    ///
    /// Batch mode never forwards; outcomes are never forwarded.
    pub fn accept(&mut self, fragment: Fragment) -> Option<String> {
        let is_answer = fragment.is_text();
        let text = match fragment {
            Fragment::Outcome(outcome) => {
                self.outcome = Some(outcome);
                return None;
            }
            Fragment::Banner(t)
            | Fragment::Reasoning(t)
            | Fragment::Narration(t)
            | Fragment::Text(t) => t,
        };
        if text.is_empty() {
            return None;
        }

        if is_answer {
            self.answer.push_str(&text);
        }
        self.text.push_str(&text);
        match self.mode {
            Mode::Streaming => Some(text),
            Mode::Batch => None,
        }
    }

    /// Everything accepted so far, untrimmed.
    pub fn accumulated(&self) -> &str {
        &self.text
    }

    /// Close the stream and produce the final body.
    ///
    /// In batch mode the outcome text is appended, unless it only repeats the
    /// assistant text already accumulated. The result is trimmed; empty is an
    /// error.
    pub fn finish(self) -> Result<String, EmptyResponse> {
        let mut text = self.text;
        if self.mode == Mode::Batch
            && let Some(outcome) = &self.outcome
            && !outcome.text.trim().is_empty()
            && outcome.text.trim() != self.answer.trim()
        {
            if !text.trim().is_empty() {
                text.push_str(self.result_separator);
            }
            text.push_str(&outcome.text);
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(EmptyResponse);
        }

        let mut body = trimmed.to_string();
        if self.mode == Mode::Batch
            && self.timing_footer
            && let Some(ms) = self.outcome.as_ref().and_then(|o| o.duration_ms)
        {
            body.push_str(&format!("\n\n⏱️  Completed in {ms}ms"));
        }
        Ok(body)
    }
}
