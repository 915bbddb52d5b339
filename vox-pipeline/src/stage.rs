use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Shared view of the post-processing pipeline, read by the terminal
/// renderer while the active stage writes it.
///
/// Only one stage is active at a time, so the step name and progress are
/// simple published cells rather than a queue of events.
#[derive(Debug, Default)]
pub struct PipelineStatus {
    step: Mutex<String>,
    progress: AtomicU64,
}

impl PipelineStatus {
    pub fn new() -> Self {
        PipelineStatus::default()
    }

    /// Enters a new step, resetting progress.
    pub fn update(&self, step: &str, progress: f64) {
        *self.step.lock().unwrap() = step.to_string();
        self.progress.store(progress.to_bits(), Ordering::Relaxed);
    }

    pub fn set_progress(&self, progress: f64) {
        self.progress.store(progress.to_bits(), Ordering::Relaxed);
    }

    pub fn step(&self) -> String {
        self.step.lock().unwrap().clone()
    }

    pub fn progress(&self) -> f64 {
        f64::from_bits(self.progress.load(Ordering::Relaxed))
    }
}

/// A synchronous post-processing transform.
///
/// A stage owns its input, returns its output, and reports progress by
/// overwriting the shared status with its step name on entry and a rising
/// fraction while it works.
pub trait Stage {
    type Input;
    type Output;

    fn process(&self, input: Self::Input, status: &PipelineStatus) -> Self::Output;
}

impl<S: Stage + ?Sized> Stage for Box<S> {
    type Input = S::Input;
    type Output = S::Output;

    fn process(&self, input: Self::Input, status: &PipelineStatus) -> Self::Output {
        (**self).process(input, status)
    }
}

/// A stage with its concrete type erased, for assembling option-dependent
/// chains with uniform endpoint types.
pub type BoxedStage<I, O> = Box<dyn Stage<Input = I, Output = O>>;

/// Two stages run back to back. Composition is associative: regrouping a
/// chain changes neither the output nor the observable status transitions.
pub struct Chain<First, Second> {
    first: First,
    second: Second,
}

/// Composes two stages into one, feeding the first stage's output to the
/// second.
pub fn chain<First, Second>(first: First, second: Second) -> Chain<First, Second>
where
    First: Stage,
    Second: Stage<Input = First::Output>,
{
    Chain { first, second }
}

impl<First, Second> Stage for Chain<First, Second>
where
    First: Stage,
    Second: Stage<Input = First::Output>,
{
    type Input = First::Input;
    type Output = Second::Output;

    fn process(&self, input: Self::Input, status: &PipelineStatus) -> Self::Output {
        let intermediate = self.first.process(input, status);
        self.second.process(intermediate, status)
    }
}

/// Runs a pipeline to completion and writes the empty-step sentinel that
/// tells the renderer to shut down.
pub fn run_pipeline<S: Stage>(
    input: S::Input,
    pipeline: &S,
    status: &PipelineStatus,
) -> S::Output {
    let output = pipeline.process(input, status);
    status.update("", 1.0);
    output
}
