use crate::chunk::{Chunk, Kind};
use crate::sync::Mutex;
use std::io::Write;
use std::sync::Arc;
use termcolor::ColorChoice::Auto;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

/// Destination for chunks the collator has decided are safe to emit.
///
/// The collator calls `emit` synchronously, once per chunk, while holding
/// its internal lock, both for chunks forwarded live and for chunks
/// replayed from a task's buffer. Implementations must be fast and must
/// not call back into the collator.
///
/// A sink is injected at collator construction so callers choose where
/// output lands: [`ConsoleSink`] for a terminal, [`MemorySink`] for tests
/// and observability.
pub trait Sink: Send {
    fn emit(&mut self, chunk: Chunk);
}

/// Sink that writes chunks to a terminal stream.
///
/// `Primary` chunks are written unstyled; `Secondary` chunks are written
/// in the sink's secondary color (red unless overridden) and the style is
/// reset afterward. Terminal write errors are discarded: the emit
/// capability has no way to report failure, and a broken terminal must
/// not take the run down with it.
pub struct ConsoleSink {
    stream: StandardStream,
    secondary: ColorSpec,
}

impl ConsoleSink {
    /// Makes a sink whose output goes to stdout.
    pub fn stdout() -> Self {
        Self::new(StandardStream::stdout(Auto))
    }

    /// Makes a sink whose output goes to stderr.
    pub fn stderr() -> Self {
        Self::new(StandardStream::stderr(Auto))
    }

    fn new(stream: StandardStream) -> Self {
        let mut secondary = ColorSpec::new();
        secondary.set_fg(Some(Color::Red));
        ConsoleSink { stream, secondary }
    }

    /// Set the color used for `Secondary` chunks.
    pub fn secondary_color(mut self, color: Color) -> Self {
        self.secondary.set_fg(Some(color));
        self
    }
}

impl Sink for ConsoleSink {
    fn emit(&mut self, chunk: Chunk) {
        match chunk.kind {
            Kind::Primary => {
                let _ = self.stream.write_all(chunk.text.as_bytes());
            }
            Kind::Secondary => {
                let _ = self.stream.set_color(&self.secondary);
                let _ = self.stream.write_all(chunk.text.as_bytes());
                let _ = self.stream.reset();
            }
        }
    }
}

/// Sink that collects chunks in memory.
///
/// Cloning yields another handle to the same storage, so a caller can
/// keep one handle while the collator owns the other and inspect what
/// has been emitted so far.
#[derive(Clone)]
pub struct MemorySink {
    chunks: Arc<Mutex<Vec<Chunk>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink {
            chunks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of every chunk emitted so far, in emission order.
    pub fn chunks(&self) -> Vec<Chunk> {
        self.chunks.lock().clone()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for MemorySink {
    fn emit(&mut self, chunk: Chunk) {
        self.chunks.lock().push(chunk);
    }
}
