/// Classification of a chunk of task output.
///
/// The collator never interprets the distinction; it tags each chunk and
/// passes the tag through to the sink unchanged. A terminal sink typically
/// renders `Secondary` output styled differently from `Primary` output,
/// the way stderr is conventionally distinguished from stdout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Ordinary output, stdout-like.
    Primary,
    /// Error-style output, stderr-like.
    Secondary,
}

/// One unit of output produced by a task.
///
/// Chunks are opaque to the collator: the text is never inspected, split,
/// or merged, and chunks from the same task are never reordered relative
/// to one another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub kind: Kind,
}

impl Chunk {
    pub fn new(text: impl Into<String>, kind: Kind) -> Self {
        Chunk {
            text: text.into(),
            kind,
        }
    }
}
