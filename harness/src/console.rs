//! Output sink handed to candidates.
//!
//! Candidates never write to the process streams. Each invocation gets its own
//! [`CaptureBuffer`] through the [`Console`] trait, and the buffer is consumed
//! when the invocation ends.

use std::io::Write;

use serde_json::Value;

/// Textual output channel available to a candidate.
pub trait Console {
    /// Append one line. A newline is added after `line`.
    fn write_line(&mut self, line: &str);

    /// Write `values` joined by a single space as one line.
    ///
    /// Strings are written verbatim; other values use compact JSON.
    fn log(&mut self, values: &[Value]) {
        let line = values
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(" ");
        self.write_line(&line);
    }
}

pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// In-memory accumulator bounded to `limit_bytes`, optionally mirrored to a writer.
pub struct CaptureBuffer {
    text: String,
    limit_bytes: usize,
    dropped_bytes: usize,
    tee: Option<Box<dyn Write>>,
}

impl CaptureBuffer {
    pub fn new(limit_bytes: usize) -> Self {
        Self {
            text: String::new(),
            limit_bytes,
            dropped_bytes: 0,
            tee: None,
        }
    }

    /// Mirror every line to `writer` as it is written (including lines past the limit).
    pub fn tee(mut self, writer: Box<dyn Write>) -> Self {
        self.tee = Some(writer);
        self
    }

    pub fn dropped_bytes(&self) -> usize {
        self.dropped_bytes
    }

    /// Consume the buffer, appending a notice if output was dropped.
    pub fn finish(mut self) -> String {
        if let Some(tee) = self.tee.as_mut() {
            tee.flush().ok();
        }
        if self.dropped_bytes > 0 {
            self.text.push_str(&format!(
                "\n[output truncated {} bytes]\n",
                self.dropped_bytes
            ));
        }
        self.text
    }

    fn append(&mut self, chunk: &str) {
        let room = self.limit_bytes.saturating_sub(self.text.len());
        if chunk.len() <= room {
            self.text.push_str(chunk);
            return;
        }
        let mut cut = room;
        while !chunk.is_char_boundary(cut) {
            cut -= 1;
        }
        self.text.push_str(&chunk[..cut]);
        self.dropped_bytes += chunk.len() - cut;
    }
}

impl Console for CaptureBuffer {
    fn write_line(&mut self, line: &str) {
        if let Some(tee) = self.tee.as_mut() {
            // mirror failures must not affect the capture
            writeln!(tee, "{line}").ok();
        }
        self.append(line);
        self.append("\n");
    }
}
