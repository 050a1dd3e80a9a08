//! Line splitting for the plugin's stdout and stderr
//!
//! The plugin writes arbitrary chunks. Only whole lines reach the console; a
//! trailing partial line waits in the buffer until its `\n` arrives.

/// Accumulates stream chunks and releases complete lines
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    pending: String,
}

impl LineBuffer {
    pub const fn new() -> Self {
        Self {
            pending: String::new(),
        }
    }

    /// Append a chunk and return every line it completes, without the `\n`
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.pending.push_str(text);
        let Some(last_break) = self.pending.rfind('\n') else {
            return Vec::new();
        };
        let rest = self.pending.split_off(last_break + 1);
        let complete = std::mem::replace(&mut self.pending, rest);
        complete[..last_break].split('\n').map(str::to_owned).collect()
    }

    /// Text received since the last line break
    pub fn pending(&self) -> &str {
        &self.pending
    }
}
