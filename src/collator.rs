#[path = "writer.rs"]
mod writer;

use crate::chunk::Chunk;
use crate::error::{Error, Result};
use crate::sink::{ConsoleSink, Sink};
use crate::sync::Mutex;
use std::mem;
use std::sync::Arc;
use tracing::{debug, trace};

pub use self::writer::TaskWriter;

/// Collation engine that turns output from concurrently running tasks into
/// one deterministic stream.
///
/// Tasks are registered by name, each taking the next position in the
/// emission order. Writes from the task at the front of that order pass
/// straight through to the sink; writes from every other task land in a
/// per-task buffer. When the front task closes, its remaining buffer is
/// flushed and the next task takes over the stream. The combined output
/// always reads as if the tasks had run one after another in registration
/// order.
///
/// # Skeleton
///
/// Workers drain a shared queue of named work items. Output appears
/// grouped by task, in registration order, no matter which worker picks
/// up which item or how long each one takes.
///
/// ```
/// use omux::{Collator, TaskWriter};
/// use std::sync::Mutex;
///
/// fn main() -> omux::Result<()> {
///     let collator = Collator::stderr();
///
///     let mut work = Vec::new();
///     for name in ["core", "cli", "server", "docs"] {
///         work.push((name, collator.register(name)?));
///     }
///     let work = Mutex::new(work.into_iter());
///
///     // Ten workers share the queue.
///     rayon::scope(|scope| {
///         for _ in 0..10 {
///             scope.spawn(|_| worker(&work));
///         }
///     });
///
///     Ok(())
/// }
///
/// fn worker(work: &Mutex<std::vec::IntoIter<(&str, TaskWriter)>>) {
///     loop {
///         let next = work.lock().unwrap().next();
///         let (name, writer) = match next {
///             Some(item) => item,
///             None => return,
///         };
///         let _ = writer.out(format!("building {name}\n"));
///         let _ = writer.close();
///     }
/// }
/// ```
pub struct Collator {
    registry: Arc<Mutex<Registry>>,
}

#[cfg(test)]
struct _Test
where
    Collator: Send + Sync,
    TaskWriter: Send;

struct Registry {
    sink: Box<dyn Sink>,
    /// All tasks ever registered, in registration order. A task's index in
    /// this vec is its fixed position in the emission order. Entries are
    /// never removed; names stay reserved for the life of the engine.
    tasks: Vec<TaskEntry>,
}

struct TaskEntry {
    name: String,
    state: State,
    buffer: Vec<Chunk>,
}

enum State {
    /// Registered, still writing.
    Open,
    /// Closed by its writer, buffer not yet flushed.
    Closed,
    /// Closed and fully flushed. Terminal.
    Done,
}

impl Collator {
    /// Makes a collator that emits finished chunks into the given sink.
    ///
    /// The sink is the single point where output leaves the engine; tests
    /// typically pass a [`MemorySink`](crate::MemorySink) and inspect it
    /// afterward.
    pub fn new(sink: impl Sink + 'static) -> Self {
        Collator {
            registry: Arc::new(Mutex::new(Registry {
                sink: Box::new(sink),
                tasks: Vec::new(),
            })),
        }
    }

    /// Makes a collator whose output goes to stdout.
    pub fn stdout() -> Self {
        Self::new(ConsoleSink::stdout())
    }

    /// Makes a collator whose output goes to stderr.
    pub fn stderr() -> Self {
        Self::new(ConsoleSink::stderr())
    }

    /// Registers a task under `name` and returns the writer for its output.
    ///
    /// The task takes the position after all previously registered tasks
    /// in the emission order, regardless of how far collation has already
    /// advanced. Names are reserved for the life of the engine: a name is
    /// rejected with [`Error::DuplicateTask`] even if the task that held
    /// it has long since finished.
    pub fn register(&self, name: impl Into<String>) -> Result<TaskWriter> {
        let name = name.into();
        let index = self.registry.lock().register(name.clone())?;
        Ok(TaskWriter::new(Arc::clone(&self.registry), name, index))
    }
}

impl Registry {
    fn register(&mut self, name: String) -> Result<usize> {
        if self.tasks.iter().any(|task| task.name == name) {
            return Err(Error::DuplicateTask { name });
        }
        let index = self.tasks.len();
        debug!(task = %name, index, "registered task");
        self.tasks.push(TaskEntry {
            name,
            state: State::Open,
            buffer: Vec::new(),
        });
        Ok(index)
    }

    fn write(&mut self, index: usize, chunk: Chunk) -> Result<()> {
        match self.tasks[index].state {
            State::Open => {}
            State::Closed | State::Done => {
                return Err(Error::ClosedWriter {
                    name: self.tasks[index].name.clone(),
                });
            }
        }

        // Live forwarding requires owning the front of the queue with
        // nothing left in the backlog; a task that inherited the front
        // while it still has buffered output keeps buffering so its
        // history is never overtaken by its newer writes.
        if self.front() == Some(index) && self.tasks[index].buffer.is_empty() {
            self.sink.emit(chunk);
        } else {
            self.tasks[index].buffer.push(chunk);
        }
        Ok(())
    }

    fn close(&mut self, index: usize) -> Result<()> {
        match self.tasks[index].state {
            State::Open => self.tasks[index].state = State::Closed,
            State::Closed | State::Done => {
                return Err(Error::AlreadyClosed {
                    name: self.tasks[index].name.clone(),
                });
            }
        }
        self.cascade();
        Ok(())
    }

    /// Flushes and retires closed tasks from the front of the queue until
    /// the front task is still open or no tasks remain.
    fn cascade(&mut self) {
        while let Some(index) = self.front() {
            if let State::Open = self.tasks[index].state {
                break;
            }
            let buffer = mem::take(&mut self.tasks[index].buffer);
            trace!(
                task = %self.tasks[index].name,
                chunks = buffer.len(),
                "flushing finished task",
            );
            for chunk in buffer {
                self.sink.emit(chunk);
            }
            self.tasks[index].state = State::Done;
        }
    }

    /// The task that currently owns the output stream: the lowest
    /// registered task that has not finished. Recomputed on every use;
    /// finished tasks always form a prefix, so this is a short scan.
    fn front(&self) -> Option<usize> {
        self.tasks
            .iter()
            .position(|task| !matches!(task.state, State::Done))
    }

    fn peek_buffer(&self, index: usize) -> Vec<Chunk> {
        self.tasks[index].buffer.clone()
    }

    fn is_open(&self, index: usize) -> bool {
        matches!(self.tasks[index].state, State::Open)
    }
}
