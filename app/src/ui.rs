use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use vox_ingest::ConcurrentStatus;
use vox_pipeline::PipelineStatus;

const TICK: Duration = Duration::from_millis(200);

/// Renders the ingest run until `quit` is raised: dispatched chunks, merged
/// chunks, and the mean progress of the worker pool.
pub fn spawn_ingest_renderer(
    status: Arc<ConcurrentStatus>,
    quit: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:60.green/white}] {pos}/{len} chunks {msg}")
                .unwrap(),
        );

        while !quit.load(Ordering::Relaxed) {
            bar.set_length(status.total_chunks() as u64);
            bar.set_position(status.merges() as u64);

            let progress = status.chunk_progress();
            let active = progress.iter().filter(|&&p| p < 1.0).count();
            let mean = if progress.is_empty() {
                0.0
            } else {
                progress.iter().sum::<f64>() / progress.len() as f64
            };
            bar.set_message(format!(
                "dispatched {} | {} workers busy | pool {:.0}%",
                status.current_chunk(),
                active,
                mean * 100.0
            ));

            thread::sleep(TICK);
        }

        bar.finish_and_clear();
    })
}

/// Renders the post-processing pipeline until `quit` is raised, tracking
/// the active stage's step name and progress. An empty step name means the
/// pipeline has returned and the renderer can finish early.
pub fn spawn_pipeline_renderer(
    status: Arc<PipelineStatus>,
    quit: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:60.green/white}] {msg}")
                .unwrap(),
        );

        let mut previous_step = String::new();
        while !quit.load(Ordering::Relaxed) {
            let step = status.step();
            if step != previous_step {
                if !previous_step.is_empty() {
                    log::info!("finished {}", previous_step.to_lowercase());
                }
                previous_step = step.clone();
            }

            if !step.is_empty() {
                bar.set_position((status.progress() * 100.0) as u64);
                bar.set_message(step);
            }

            thread::sleep(TICK);
        }

        bar.finish_and_clear();
    })
}
