use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use crate::{
    assets::{
        decode::{Frame, decode_frame},
        frames::FrameSource,
    },
    foundation::core::FrameIndex,
    foundation::error::{ReelError, ReelResult},
    host::event_loop::{EventSender, HostEvent},
};

/// Decodes frame files on a dedicated rayon pool and posts completions to the host.
///
/// Each frame is an independent job, so completions arrive in whatever order the
/// workers finish them.
#[derive(Clone)]
pub struct FrameLoader {
    pool: Arc<rayon::ThreadPool>,
}

impl std::fmt::Debug for FrameLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameLoader")
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}

impl FrameLoader {
    pub fn new(threads: Option<usize>) -> ReelResult<Self> {
        Ok(Self {
            pool: Arc::new(build_thread_pool(threads)?),
        })
    }

    /// Start loading every frame of `source`. Dropping the returned handle cancels
    /// jobs that have not started decoding yet.
    #[tracing::instrument(skip(self, source, sender), fields(count = source.count))]
    pub fn spawn(&self, source: &FrameSource, sender: EventSender) -> LoadHandle {
        let cancel = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicUsize::new(0));
        for index in source.indices() {
            let path = source.path_for(index);
            let sender = sender.clone();
            let cancel = cancel.clone();
            let finished = finished.clone();
            self.pool.spawn(move || {
                if cancel.load(Ordering::Acquire) {
                    return;
                }
                let event = match load_one(&path, index) {
                    Ok(frame) => HostEvent::FrameLoaded { frame },
                    Err(e) => HostEvent::FrameFailed {
                        index,
                        reason: format!("{}: {e:#}", path.display()),
                    },
                };
                finished.fetch_add(1, Ordering::AcqRel);
                if !cancel.load(Ordering::Acquire) {
                    // The host may already be gone; nothing to report to then.
                    let _ = sender.send(event);
                }
            });
        }
        tracing::debug!("frame jobs queued");
        LoadHandle {
            cancel,
            finished,
            total: source.count,
        }
    }
}

fn load_one(path: &std::path::Path, index: FrameIndex) -> ReelResult<Frame> {
    let bytes =
        std::fs::read(path).map_err(|e| ReelError::asset(format!("read frame file: {e}")))?;
    decode_frame(&bytes, index)
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::validation("loader threads must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("frame-loader-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::asset(format!("failed to build loader thread pool: {e}")))
}

/// Ownership of an in-flight load. Cancels on drop.
#[derive(Debug)]
pub struct LoadHandle {
    cancel: Arc<AtomicBool>,
    finished: Arc<AtomicUsize>,
    total: usize,
}

impl LoadHandle {
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// Jobs that finished decoding (or failing), whether or not they were delivered.
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::Acquire)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
