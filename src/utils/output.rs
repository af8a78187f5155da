/// Child output handling: line splitting, structured result parsing, and a
/// bounded tail kept for failure reports.
use crate::config::types::Part;
use crate::core::types::ParsedResult;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

static SOLUTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Part (?P<part>1|2) solution: (?P<answer>\S+)").expect("valid solution pattern")
});

/// Match one output line against the structured result pattern.
pub fn parse_solution_line(line: &str) -> Option<ParsedResult> {
    let caps = SOLUTION_RE.captures(line)?;
    let part = caps.name("part")?.as_str().parse::<Part>().ok()?;
    Some(ParsedResult {
        part,
        answer: caps.name("answer")?.as_str().to_string(),
    })
}

/// Accumulates parsed results for the requested parts in first-seen order.
#[derive(Debug)]
pub struct SolutionCollector {
    requested: Vec<Part>,
    results: Vec<ParsedResult>,
}

impl SolutionCollector {
    pub fn new(requested: Vec<Part>) -> Self {
        Self {
            requested,
            results: Vec::new(),
        }
    }

    /// Feed one line. Returns true when it contributed a new result.
    pub fn observe(&mut self, line: &str) -> bool {
        let Some(parsed) = parse_solution_line(line) else {
            return false;
        };
        if !self.requested.contains(&parsed.part) {
            log::debug!("Ignoring solution for unrequested part {}", parsed.part);
            return false;
        }
        if self.results.iter().any(|r| r.part == parsed.part) {
            log::debug!("Ignoring repeated solution for part {}", parsed.part);
            return false;
        }
        self.results.push(parsed);
        true
    }

    pub fn is_complete(&self) -> bool {
        self.requested
            .iter()
            .all(|part| self.results.iter().any(|r| r.part == *part))
    }

    pub fn missing(&self) -> Vec<Part> {
        self.requested
            .iter()
            .copied()
            .filter(|part| !self.results.iter().any(|r| r.part == *part))
            .collect()
    }

    pub fn into_results(self) -> Vec<ParsedResult> {
        self.results
    }
}

/// Ring buffer of the most recent output lines.
#[derive(Debug)]
pub struct OutputTail {
    capacity: usize,
    lines: VecDeque<String>,
    dropped: usize,
}

impl OutputTail {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            lines: VecDeque::with_capacity(capacity.min(256)),
            dropped: 0,
        }
    }

    pub fn push(&mut self, line: &str) {
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
            self.dropped += 1;
        }
        self.lines.push_back(line.to_string());
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.dropped > 0 {
            out.push_str(&format!("... ({} earlier lines omitted)\n", self.dropped));
        }
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Outcome of a single read from the child's pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    Data,
    Eof,
}

/// Splits a byte stream into lines.
///
/// `fill` performs exactly one `read` call, so it never blocks once the
/// readiness wait has reported the descriptor readable.
pub struct LineBuffer<R> {
    source: R,
    pending: Vec<u8>,
    eof: bool,
}

impl<R: Read> LineBuffer<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            pending: Vec::new(),
            eof: false,
        }
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    pub fn at_eof(&self) -> bool {
        self.eof
    }

    pub fn fill(&mut self) -> std::io::Result<ReadState> {
        if self.eof {
            return Ok(ReadState::Eof);
        }
        let mut chunk = [0u8; 8192];
        loop {
            match self.source.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(ReadState::Eof);
                }
                Ok(n) => {
                    self.pending.extend_from_slice(&chunk[..n]);
                    return Ok(ReadState::Data);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Next complete line without its terminator. After EOF a trailing
    /// unterminated fragment is returned as a final line.
    pub fn next_line(&mut self) -> Option<String> {
        let line = match self.pending.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
                line.pop();
                line
            }
            None if self.eof && !self.pending.is_empty() => std::mem::take(&mut self.pending),
            None => return None,
        };
        let mut text = String::from_utf8_lossy(&line).into_owned();
        if text.ends_with('\r') {
            text.pop();
        }
        Some(text)
    }
}
