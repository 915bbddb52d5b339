use std::sync::Arc;
use std::thread;

use crossbeam_channel::bounded;

use vox_las::LasFile;

use crate::chunk::Chunk;
use crate::error::IngestError;
use crate::processor::Processor;
use crate::status::ConcurrentStatus;

/// Runs the processor over the chunks with a pool of `concurrency` workers,
/// folding per-chunk accumulators in arrival order.
///
/// A dispatcher thread feeds the chunk queue in index order and then sends
/// one shutdown sentinel per worker. The fold is order-insensitive because
/// `merge` is commutative and associative. The first failing chunk aborts
/// the run; remaining outputs are drained so every thread shuts down before
/// the error propagates.
pub fn process_parallel<P>(
    file: &LasFile,
    chunks: &[Chunk],
    processor: &P,
    concurrency: usize,
    status: &ConcurrentStatus,
) -> Result<P::Output, IngestError>
where
    P: Processor,
{
    let slots = status.begin_run(chunks.len(), concurrency);

    let (chunk_tx, chunk_rx) = bounded::<Option<Chunk>>(0);
    let (output_tx, output_rx) = bounded::<Result<P::Output, IngestError>>(0);

    thread::scope(|scope| {
        scope.spawn(move || {
            for (index, chunk) in chunks.iter().enumerate() {
                status.set_current_chunk(index);
                if chunk_tx.send(Some(*chunk)).is_err() {
                    return;
                }
            }
            status.set_current_chunk(chunks.len());
            for _ in 0..concurrency {
                if chunk_tx.send(None).is_err() {
                    return;
                }
            }
        });

        for slot in &slots {
            let worker_rx = chunk_rx.clone();
            let worker_tx = output_tx.clone();
            let slot = Arc::clone(slot);
            scope.spawn(move || {
                while let Ok(Some(chunk)) = worker_rx.recv() {
                    if let Err(error) = processor.process_chunk(file, chunk, &worker_tx, &slot) {
                        let _ = worker_tx.send(Err(error));
                    }
                }
            });
        }

        // Only workers hold senders now, so a dead pool disconnects the
        // output queue instead of hanging the fold.
        drop(chunk_rx);
        drop(output_tx);

        let mut merged = processor.empty(&file.header);
        let mut failure = None;

        for _ in 0..chunks.len() {
            match output_rx.recv() {
                Ok(Ok(output)) => {
                    if failure.is_none() {
                        merged = processor.merge(merged, output);
                        status.add_merge();
                    }
                }
                Ok(Err(error)) => {
                    if failure.is_none() {
                        failure = Some(error);
                    }
                }
                Err(_) => break,
            }
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(merged),
        }
    })
}

/// Single-worker variant of [`process_parallel`] with strict left-to-right
/// chunk order; used for diagnostics and as the reference the parallel
/// driver is tested against.
pub fn process_sequential<P>(
    file: &LasFile,
    chunks: &[Chunk],
    processor: &P,
    status: &ConcurrentStatus,
) -> Result<P::Output, IngestError>
where
    P: Processor,
{
    let slots = status.begin_run(chunks.len(), 1);
    let (output_tx, output_rx) = bounded(1);

    let mut merged = processor.empty(&file.header);
    for (index, chunk) in chunks.iter().enumerate() {
        status.set_current_chunk(index);
        processor.process_chunk(file, *chunk, &output_tx, &slots[0])?;
        if let Ok(output) = output_rx.try_recv() {
            merged = processor.merge(merged, output?);
            status.add_merge();
        }
    }
    status.set_current_chunk(chunks.len());

    Ok(merged)
}
