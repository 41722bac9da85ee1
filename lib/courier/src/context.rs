//! Execution contexts.
//!
//! An [`ExecutionContext`] decides where a piece of work runs. The executor
//! uses one to run response decoding and another to deliver outcomes to
//! callbacks.

use tokio::runtime::Handle;

/// Unit of work handed to a context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs jobs somewhere.
///
/// Any `Fn(Job)` is a context, which makes it easy to wrap another one (e.g.
/// to count dispatches in a test).
pub trait ExecutionContext: Send + Sync {
    /// Run the job. It may run before this returns or later.
    fn execute(&self, job: Job);
}

impl<F> ExecutionContext for F
where
    F: Fn(Job) + Send + Sync,
{
    fn execute(&self, job: Job) {
        self(job);
    }
}

/// Runs the job immediately on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl ExecutionContext for Inline {
    fn execute(&self, job: Job) {
        job();
    }
}

/// Runs the job on the Tokio blocking pool.
///
/// For CPU-heavy decoders. Must be used from within a Tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blocking;

impl ExecutionContext for Blocking {
    fn execute(&self, job: Job) {
        drop(tokio::task::spawn_blocking(job));
    }
}

/// Runs the job as a task on a given Tokio runtime.
#[derive(Debug, Clone)]
pub struct Spawn(pub Handle);

impl Spawn {
    /// Context for the runtime the caller is running on.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a Tokio runtime.
    #[must_use]
    pub fn current() -> Self {
        Self(Handle::current())
    }
}

impl ExecutionContext for Spawn {
    fn execute(&self, job: Job) {
        drop(self.0.spawn(async move { job() }));
    }
}
