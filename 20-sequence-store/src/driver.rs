//! Demo driver: concurrent appenders, a join barrier, then replace and read.
//!
//! The driver owns the store for the duration of a run and hands `Arc`
//! clones to its workers. Waiting for the workers happens here, outside the
//! store; the store itself never blocks on anything but its own lock.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use futures::future::join_all;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::cli::{default_replacement, Runtime};
use crate::report::Report;
use crate::store::SequenceStore;

/// Parameters for one driver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    pub workers: usize,
    pub prefix: String,
    pub replacement: Vec<String>,
    pub runtime: Runtime,
    pub jitter_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            prefix: "Item".to_string(),
            replacement: default_replacement(),
            runtime: Runtime::default(),
            jitter_ms: 0,
        }
    }
}

/// Item appended by worker `id`.
pub fn marker(prefix: &str, id: usize) -> String {
    format!("{prefix} {id}")
}

/// Runs the full demo: append concurrently, join, snapshot, replace, snapshot.
///
/// For [`Runtime::Tokio`] this builds and owns a runtime, so it must not be
/// called from inside one; async callers use [`run_async`] instead.
pub fn run(config: &DriverConfig) -> Result<Report> {
    let store = Arc::new(SequenceStore::new());

    log_spawn(config);
    match config.runtime {
        Runtime::Threads | Runtime::Rayon => append_blocking(&store, config)?,
        Runtime::Tokio => {
            if tokio::runtime::Handle::try_current().is_ok() {
                bail!("a tokio runtime is already running; use run_async for the tokio runtime");
            }
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to build tokio runtime")?;
            runtime.block_on(append_with_tasks(Arc::clone(&store), config))?;
        }
    }

    Ok(replace_and_report(&store, config))
}

/// Async counterpart of [`run`] for callers already on a tokio runtime.
///
/// Thread and rayon workers are driven from the blocking pool so the
/// caller's executor is never stalled by the join.
pub async fn run_async(config: &DriverConfig) -> Result<Report> {
    let store = Arc::new(SequenceStore::new());

    log_spawn(config);
    match config.runtime {
        Runtime::Tokio => append_with_tasks(Arc::clone(&store), config).await?,
        Runtime::Threads | Runtime::Rayon => {
            let (store, config) = (Arc::clone(&store), config.clone());
            tokio::task::spawn_blocking(move || append_blocking(&store, &config))
                .await
                .context("appender pool failed")??;
        }
    }

    Ok(replace_and_report(&store, config))
}

fn log_spawn(config: &DriverConfig) {
    info!(
        workers = config.workers,
        runtime = ?config.runtime,
        "spawning appenders"
    );
}

fn append_blocking(store: &Arc<SequenceStore>, config: &DriverConfig) -> Result<()> {
    match config.runtime {
        Runtime::Rayon => append_with_rayon(store, config),
        _ => append_with_threads(store, config),
    }
}

fn replace_and_report(store: &SequenceStore, config: &DriverConfig) -> Report {
    let before = store.snapshot();
    info!(items = before.len(), "all appenders finished");

    store.replace_all(&config.replacement);
    let after = store.snapshot();
    info!(items = after.len(), "replaced store contents");

    Report {
        runtime: config.runtime,
        workers: config.workers,
        before,
        after,
    }
}

/// One OS thread per worker, joined in spawn order.
pub fn append_with_threads(store: &Arc<SequenceStore>, config: &DriverConfig) -> Result<()> {
    spawn_and_join(config.workers, |id| {
        let store = Arc::clone(store);
        let prefix = config.prefix.clone();
        let jitter_ms = config.jitter_ms;
        thread::Builder::new()
            .name(format!("appender-{id}"))
            .spawn(move || {
                thread::sleep(jitter(jitter_ms));
                append_marker(&store, &prefix, id);
            })
    })
}

/// Spawns `workers` threads with `spawn` and joins all of them.
///
/// If a spawn fails, the threads already running are joined before the
/// error is returned, so none outlives the call.
fn spawn_and_join<F>(workers: usize, mut spawn: F) -> Result<()>
where
    F: FnMut(usize) -> io::Result<JoinHandle<()>>,
{
    let mut handles = Vec::with_capacity(workers);
    for id in 0..workers {
        match spawn(id) {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                if let Err(join_err) = join_appenders(handles) {
                    warn!(error = %join_err, "appender failed while unwinding spawn error");
                }
                return Err(err).with_context(|| format!("failed to spawn appender {id}"));
            }
        }
    }
    join_appenders(handles)
}

fn join_appenders(handles: Vec<JoinHandle<()>>) -> Result<()> {
    let mut first_panic = None;
    for (id, handle) in handles.into_iter().enumerate() {
        if handle.join().is_err() && first_panic.is_none() {
            first_panic = Some(id);
        }
    }
    match first_panic {
        Some(id) => Err(anyhow!("appender {id} panicked")),
        None => Ok(()),
    }
}

/// Workers run as rayon scope tasks; the scope returns once all have finished.
pub fn append_with_rayon(store: &Arc<SequenceStore>, config: &DriverConfig) -> Result<()> {
    let prefix = config.prefix.as_str();
    let jitter_ms = config.jitter_ms;

    // rayon re-raises a worker panic when the scope ends.
    panic::catch_unwind(AssertUnwindSafe(|| {
        rayon::scope(|scope| {
            for id in 0..config.workers {
                let store = Arc::clone(store);
                scope.spawn(move |_| {
                    thread::sleep(jitter(jitter_ms));
                    append_marker(&store, prefix, id);
                });
            }
        })
    }))
    .map_err(|_| anyhow!("a rayon appender panicked"))
}

/// One tokio task per worker, awaited together.
pub async fn append_with_tasks(store: Arc<SequenceStore>, config: &DriverConfig) -> Result<()> {
    let tasks = (0..config.workers).map(|id| {
        let store = Arc::clone(&store);
        let prefix = config.prefix.clone();
        let delay = jitter(config.jitter_ms);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            append_marker(&store, &prefix, id);
        })
    });

    for (id, result) in join_all(tasks).await.into_iter().enumerate() {
        result.with_context(|| format!("appender task {id} failed"))?;
    }
    Ok(())
}

fn append_marker(store: &SequenceStore, prefix: &str, id: usize) {
    let item = marker(prefix, id);
    debug!(worker = id, %item, "appending");
    store.append(item);
}

fn jitter(max_ms: u64) -> Duration {
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
}
