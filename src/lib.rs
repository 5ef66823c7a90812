//! Deterministic, single-stream collation of output from tasks that run in
//! parallel, without requiring the tasks to coordinate with each other.
//!
//! # Use case
//!
//! An orchestrator that builds the packages of a monorepo in parallel has
//! three bad options for the terminal. Letting every build write directly
//! interleaves unrelated lines into soup. Handing the stream to one build
//! at a time keeps the lines together but stalls every other build behind
//! the lock. Collecting each build's output and printing it when the whole
//! run finishes keeps both parallelism and readability, at the price of a
//! terminal that sits silent until the very end.
//!
//! This crate takes a fourth option: every task writes immediately into
//! its own writer and never waits, while the collator releases the
//! combined stream task by task. The task whose turn it is prints in real
//! time; everything else accumulates quietly and is replayed the moment
//! its turn arrives.
//!
//! # Guarantees
//!
//!   - Output appears grouped by task, ordered by registration, exactly as
//!     if the tasks had run sequentially.
//!
//!   - Within a task, chunks reach the sink in write order. Nothing is
//!     lost, duplicated, or split.
//!
//!   - A write never blocks on another task's progress. Tasks that are
//!     not at the front buffer without bound rather than slowing down.
//!
//! # Example
//!
//! ```
//! use omux::Collator;
//!
//! fn main() -> omux::Result<()> {
//!     let collator = Collator::stderr();
//!
//!     let mut writers = Vec::new();
//!     for name in ["alpha", "beta", "gamma"] {
//!         writers.push(collator.register(name)?);
//!     }
//!
//!     // Builds run in parallel; output still reads alpha, beta, gamma.
//!     rayon::scope(|scope| {
//!         for writer in writers {
//!             scope.spawn(move |_| {
//!                 let _ = writer.out(format!("building {}\n", writer.name));
//!                 let _ = writer.close();
//!             });
//!         }
//!     });
//!
//!     Ok(())
//! }
//! ```

mod chunk;
mod collator;
mod error;
mod sink;
mod sync;

pub use crate::chunk::{Chunk, Kind};
pub use crate::collator::{Collator, TaskWriter};
pub use crate::error::{Error, Result};
pub use crate::sink::{ConsoleSink, MemorySink, Sink};

#[doc(no_inline)]
pub use termcolor::Color;
