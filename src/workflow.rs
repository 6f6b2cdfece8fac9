//! Fan a per-item worker out over a batch. The trimming core is cheap and
//! synchronous, so this stays simple: chunk the batch, one thread per chunk,
//! each thread builds its own model once, results come back in input order.

use crate::activity::{detect_activity_segments, ActivityDetector, Recording};
use crate::manifest::{ManifestError, SupervisionSet};

#[derive(Debug, Clone, Copy)]
pub struct Processor {
    num_jobs: usize,
}

impl Processor {
    pub fn new(num_jobs: usize) -> Self {
        Self {
            num_jobs: num_jobs.max(1),
        }
    }

    /// Map `do_work` over `items`, building a fresh model per worker thread
    /// via `gen_model` (models are often expensive to construct and not
    /// `Sync`, so none is shared).
    pub fn run<T, R, M>(
        &self,
        items: Vec<T>,
        gen_model: impl Fn() -> M + Sync,
        do_work: impl Fn(&mut M, T) -> R + Sync,
    ) -> Vec<R>
    where
        T: Send,
        R: Send,
    {
        let num_jobs = self.num_jobs.min(items.len());
        if num_jobs <= 1 {
            let mut model = gen_model();
            return items.into_iter().map(|item| do_work(&mut model, item)).collect();
        }
        log::debug!("processing {} items on {} threads", items.len(), num_jobs);
        let chunk_size = items.len().div_ceil(num_jobs);
        let mut chunks: Vec<Vec<T>> = vec![];
        let mut items = items.into_iter();
        loop {
            let chunk: Vec<T> = items.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }
            chunks.push(chunk);
        }
        let mut results = Vec::new();
        let gen_model = &gen_model;
        let do_work = &do_work;
        std::thread::scope(|scope| {
            let handles: Vec<_> = chunks
                .into_iter()
                .map(|chunk| {
                    scope.spawn(move || {
                        let mut model = gen_model();
                        chunk
                            .into_iter()
                            .map(|item| do_work(&mut model, item))
                            .collect::<Vec<R>>()
                    })
                })
                .collect();
            for handle in handles {
                match handle.join() {
                    Ok(chunk_results) => results.extend(chunk_results),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
        });
        results
    }
}

/// Detect activities across a batch of recordings and collect the resulting
/// segments into one supervision set, in recording order.
pub fn detect_activities<D: ActivityDetector>(
    recordings: Vec<Recording>,
    gen_detector: impl Fn() -> D + Sync,
    num_jobs: usize,
) -> Result<SupervisionSet, ManifestError> {
    let parts = Processor::new(num_jobs).run(recordings, gen_detector, |detector, recording| {
        detect_activity_segments(&recording, detector)
    });
    SupervisionSet::from_segments(parts.into_iter().flatten())
}
