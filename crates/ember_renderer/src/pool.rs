//! Fixed-size worker pool that drains a queue of block jobs.
//!
//! All coordination goes through one mutex-guarded [`SharedState`] and a
//! condition variable the main thread sleeps on until every worker has run
//! out of jobs.

use crate::job::BlockJob;
use crate::{Camera, Scene};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

#[derive(Debug, Default)]
struct SharedState {
    pending: VecDeque<BlockJob>,
    completed: Vec<BlockJob>,
    finished_workers: usize,
}

struct Shared {
    state: Mutex<SharedState>,
    all_done: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SharedState> {
        // A panicking worker leaves the queue itself consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks a worker finished when it leaves its loop, even by unwinding.
struct WorkerExit<'a> {
    shared: &'a Shared,
    worker_id: usize,
}

impl Drop for WorkerExit<'_> {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        state.finished_workers += 1;
        log::debug!(
            "Render thread {}: done ({} finished)",
            self.worker_id,
            state.finished_workers
        );
        self.shared.all_done.notify_all();
    }
}

/// Runs block jobs on a fixed number of threads.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    thread_count: usize,
}

impl WorkerPool {
    pub fn new(thread_count: usize) -> Self {
        assert!(thread_count > 0, "worker pool needs at least one thread");
        Self { thread_count }
    }

    /// Render every job and hand them back, in completion order.
    ///
    /// Jobs are claimed in ascending order. Since each job owns its random
    /// source the results do not depend on which worker claims which job.
    pub fn run(
        &self,
        jobs: Vec<BlockJob>,
        camera: &Camera,
        scene: &Scene,
        image_width: u32,
        image_height: u32,
    ) -> Vec<BlockJob> {
        self.run_jobs(jobs, |job| job.run(camera, scene, image_width, image_height))
    }

    /// Drain `jobs` across the pool, applying `render` to each.
    ///
    /// A panic in `render` ends that worker and is re-raised here once every
    /// other worker has drained the queue.
    fn run_jobs<F>(&self, jobs: Vec<BlockJob>, render: F) -> Vec<BlockJob>
    where
        F: Fn(&mut BlockJob) + Sync,
    {
        let job_count = jobs.len();
        let shared = Shared {
            state: Mutex::new(SharedState {
                pending: jobs.into(),
                completed: Vec::with_capacity(job_count),
                finished_workers: 0,
            }),
            all_done: Condvar::new(),
        };

        thread::scope(|scope| {
            for worker_id in 0..self.thread_count {
                let (shared, render) = (&shared, &render);
                scope.spawn(move || worker_loop(worker_id, shared, render));
            }

            let mut state = shared.lock();
            while state.finished_workers < self.thread_count {
                state = shared
                    .all_done
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        });

        let state = shared
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        debug_assert_eq!(state.completed.len(), job_count);
        state.completed
    }
}

fn worker_loop<F>(worker_id: usize, shared: &Shared, render: &F)
where
    F: Fn(&mut BlockJob),
{
    let _exit = WorkerExit { shared, worker_id };
    log::debug!("Render thread {}: begin", worker_id);

    loop {
        let Some(mut job) = shared.lock().pending.pop_front() else {
            break;
        };

        log::trace!(
            "Render thread {}: rows {}..{}, cols {}..{}",
            worker_id,
            job.row_start,
            job.row_start + job.num_rows,
            job.col_start,
            job.col_start + job.num_cols
        );
        render(&mut job);

        shared.lock().completed.push(job);
    }
}
