use super::Registry;
use crate::chunk::{Chunk, Kind};
use crate::error::Result;
use crate::sync::Mutex;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Writer through which one registered task emits its output.
///
/// Obtained from [`Collator::register`]. The writer makes no ordering
/// decisions of its own: every call is delegated to the collator, which
/// either forwards the chunk straight to the sink (while this task owns
/// the output stream) or parks it in this task's buffer for later replay.
///
/// A writer may be moved to whichever thread runs the task, but a single
/// writer's calls are expected to be sequential.
///
/// ```
/// use omux::Collator;
///
/// fn work(collator: &Collator) -> omux::Result<()> {
///     let writer = collator.register("fmt-check")?;
///     writer.out("checking formatting\n")?;
///     writer.err("main.rs: trailing whitespace\n")?;
///     writer.close()
/// }
/// ```
///
/// [`Collator::register`]: super::Collator::register
#[readonly::make]
pub struct TaskWriter {
    registry: Arc<Mutex<Registry>>,

    /// Name the task was registered under.
    ///
    /// Read-only; assignments to it will not compile.
    #[readonly]
    pub name: String,

    /// Position of this task in the emission order, assigned in
    /// registration order starting from 0 and never reassigned.
    ///
    /// Read-only; assignments to it will not compile.
    #[readonly]
    pub index: usize,
}

impl Debug for TaskWriter {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter
            .debug_tuple("TaskWriter")
            .field(&self.name)
            .finish()
    }
}

impl TaskWriter {
    pub(super) fn new(registry: Arc<Mutex<Registry>>, name: String, index: usize) -> Self {
        TaskWriter {
            registry,
            name,
            index,
        }
    }

    /// Writes one chunk of output tagged with the given kind.
    ///
    /// Never blocks: the chunk is either forwarded to the sink before this
    /// call returns or appended to this task's buffer, which is unbounded.
    /// Fails with [`ClosedWriter`] once the task has been closed.
    ///
    /// [`ClosedWriter`]: crate::Error::ClosedWriter
    pub fn write(&self, text: impl Into<String>, kind: Kind) -> Result<()> {
        self.registry
            .lock()
            .write(self.index, Chunk::new(text, kind))
    }

    /// Writes a chunk of normal, stdout-like output.
    pub fn out(&self, text: impl Into<String>) -> Result<()> {
        self.write(text, Kind::Primary)
    }

    /// Writes a chunk of error-style, stderr-like output.
    pub fn err(&self, text: impl Into<String>) -> Result<()> {
        self.write(text, Kind::Secondary)
    }

    /// Signals that this task will produce no more output.
    ///
    /// If every earlier task has already finished, this task's buffered
    /// output is flushed to the sink here, followed by the buffers of any
    /// directly succeeding tasks that closed while waiting their turn.
    /// Fails with [`AlreadyClosed`] if called twice.
    ///
    /// [`AlreadyClosed`]: crate::Error::AlreadyClosed
    pub fn close(&self) -> Result<()> {
        self.registry.lock().close(self.index)
    }

    /// Snapshot of this task's buffered, not-yet-emitted output.
    ///
    /// Non-empty only while the task is waiting behind earlier tasks:
    /// output forwarded live never touches the buffer, and a finished
    /// task's buffer has been flushed. Intended for observability and
    /// tests.
    pub fn peek_buffer(&self) -> Vec<Chunk> {
        self.registry.lock().peek_buffer(self.index)
    }
}

impl Drop for TaskWriter {
    fn drop(&mut self) {
        // A writer abandoned while open must not wedge the tasks queued
        // behind it.
        let mut registry = self.registry.lock();
        if registry.is_open(self.index) {
            let _ = registry.close(self.index);
        }
    }
}
