use std::io::{self, Write};
use std::sync::Mutex;

/// `Console` serializes whole lines written by workers.
///
/// The console lock is separate from any queue lock and is never held
/// while a worker waits on the queue.
pub struct Console {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Default for Console {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Console {
    #[must_use]
    pub fn new<W: Write + Send + 'static>(sink: W) -> Self {
        Self {
            sink: Mutex::new(Box::new(sink)),
        }
    }

    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// A console that discards every line, used by stress runs.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(io::sink())
    }

    /// Writes `message` as one uninterrupted line.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the sink rejects the write.
    pub fn line(&self, message: impl core::fmt::Display) -> io::Result<()> {
        let mut sink = match self.sink.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        writeln!(sink, "{message}")?;
        tracing::trace!(line = %message, "console line written");
        sink.flush()
    }
}

impl core::fmt::Debug for Console {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}
