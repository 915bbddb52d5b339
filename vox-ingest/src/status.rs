use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Progress of a single worker through its current chunk, 0.0 to 1.0.
///
/// The value is stored as `f64` bits in an atomic so the owning worker can
/// write it without synchronization; writes are monotone within a chunk, so
/// a stale read on the UI side is cosmetic.
#[derive(Debug, Default)]
pub struct WorkerProgress(AtomicU64);

impl WorkerProgress {
    pub fn set(&self, fraction: f64) {
        self.0.store(fraction.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }
}

/// Shared view of a concurrent ingest run, read by the terminal renderer
/// while the driver and its workers write it.
///
/// `current_chunk` is written only by the dispatcher, `merges` only by the
/// driver, and progress slot `i` only by worker `i`.
#[derive(Debug, Default)]
pub struct ConcurrentStatus {
    total_chunks: AtomicUsize,
    concurrency: AtomicUsize,
    current_chunk: AtomicUsize,
    merges: AtomicUsize,
    chunk_progress: Mutex<Vec<Arc<WorkerProgress>>>,
}

impl ConcurrentStatus {
    pub fn new() -> Self {
        ConcurrentStatus::default()
    }

    /// Resets the counters for a new run and allocates one zeroed progress
    /// slot per worker, returning the slots for the driver to hand out.
    pub fn begin_run(&self, total_chunks: usize, concurrency: usize) -> Vec<Arc<WorkerProgress>> {
        self.total_chunks.store(total_chunks, Ordering::Relaxed);
        self.concurrency.store(concurrency, Ordering::Relaxed);
        self.current_chunk.store(0, Ordering::Relaxed);
        self.merges.store(0, Ordering::Relaxed);

        let slots: Vec<Arc<WorkerProgress>> = (0..concurrency)
            .map(|_| Arc::new(WorkerProgress::default()))
            .collect();
        *self.chunk_progress.lock().unwrap() = slots.clone();
        slots
    }

    pub fn set_current_chunk(&self, chunk: usize) {
        self.current_chunk.store(chunk, Ordering::Relaxed);
    }

    pub fn add_merge(&self) {
        self.merges.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_chunks(&self) -> usize {
        self.total_chunks.load(Ordering::Relaxed)
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency.load(Ordering::Relaxed)
    }

    pub fn current_chunk(&self) -> usize {
        self.current_chunk.load(Ordering::Relaxed)
    }

    pub fn merges(&self) -> usize {
        self.merges.load(Ordering::Relaxed)
    }

    /// Snapshot of every worker's chunk progress.
    pub fn chunk_progress(&self) -> Vec<f64> {
        self.chunk_progress
            .lock()
            .unwrap()
            .iter()
            .map(|slot| slot.get())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_run_resets_counters_and_slots() {
        let status = ConcurrentStatus::new();
        status.add_merge();
        status.set_current_chunk(9);

        let slots = status.begin_run(12, 4);
        assert_eq!(status.total_chunks(), 12);
        assert_eq!(status.concurrency(), 4);
        assert_eq!(status.current_chunk(), 0);
        assert_eq!(status.merges(), 0);
        assert_eq!(status.chunk_progress(), vec![0.0; 4]);

        slots[2].set(0.5);
        assert_eq!(status.chunk_progress()[2], 0.5);
    }
}
