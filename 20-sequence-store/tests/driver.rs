//! End-to-end tests for the demo driver on each runtime.

use std::sync::Arc;

use anyhow::Result;
use sequence_store::cli::Runtime;
use sequence_store::driver::{self, marker, DriverConfig};
use sequence_store::store::SequenceStore;

fn sorted(mut items: Vec<String>) -> Vec<String> {
    items.sort();
    items
}

fn expected_markers(config: &DriverConfig) -> Vec<String> {
    sorted(
        (0..config.workers)
            .map(|id| marker(&config.prefix, id))
            .collect(),
    )
}

fn check_run(runtime: Runtime) -> Result<()> {
    let config = DriverConfig {
        workers: 25,
        prefix: "Worker".into(),
        replacement: vec!["a".into(), "b".into()],
        runtime,
        jitter_ms: 2,
    };

    let report = driver::run(&config)?;

    assert_eq!(report.runtime, runtime);
    assert_eq!(report.workers, 25);
    assert_eq!(sorted(report.before), expected_markers(&config));
    assert_eq!(report.after, vec!["a", "b"]);
    Ok(())
}

#[test]
fn threads_runtime_appends_every_marker() -> Result<()> {
    check_run(Runtime::Threads)
}

#[test]
fn rayon_runtime_appends_every_marker() -> Result<()> {
    check_run(Runtime::Rayon)
}

#[test]
fn tokio_runtime_appends_every_marker() -> Result<()> {
    check_run(Runtime::Tokio)
}

#[test]
fn default_config_reproduces_classic_demo() -> Result<()> {
    let config = DriverConfig::default();
    let report = driver::run(&config)?;

    assert_eq!(report.before.len(), 10);
    assert_eq!(
        sorted(report.before),
        sorted((0..10).map(|i| format!("Item {i}")).collect())
    );
    assert_eq!(report.after, vec!["NewItem 1", "NewItem 2", "NewItem 3"]);
    Ok(())
}

#[test]
fn empty_replacement_clears_store() -> Result<()> {
    let config = DriverConfig {
        workers: 3,
        replacement: Vec::new(),
        ..DriverConfig::default()
    };
    let report = driver::run(&config)?;
    assert_eq!(report.before.len(), 3);
    assert!(report.after.is_empty());
    Ok(())
}

#[tokio::test]
async fn sync_run_inside_runtime_returns_error_for_tokio() {
    let config = DriverConfig {
        workers: 3,
        runtime: Runtime::Tokio,
        ..DriverConfig::default()
    };

    let err = driver::run(&config).expect_err("nested runtime should be rejected");
    assert!(err.to_string().contains("run_async"));
}

#[tokio::test]
async fn run_async_tokio_appends_every_marker() -> Result<()> {
    let config = DriverConfig {
        workers: 3,
        runtime: Runtime::Tokio,
        ..DriverConfig::default()
    };

    let report = driver::run_async(&config).await?;
    assert_eq!(sorted(report.before), expected_markers(&config));
    assert_eq!(report.after, vec!["NewItem 1", "NewItem 2", "NewItem 3"]);
    Ok(())
}

#[tokio::test]
async fn run_async_drives_blocking_runtimes() -> Result<()> {
    for runtime in [Runtime::Threads, Runtime::Rayon] {
        let config = DriverConfig {
            workers: 8,
            runtime,
            ..DriverConfig::default()
        };
        let report = driver::run_async(&config).await?;
        assert_eq!(report.runtime, runtime);
        assert_eq!(sorted(report.before), expected_markers(&config));
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn tasks_append_into_prefilled_store() -> Result<()> {
    let store = Arc::new(SequenceStore::from_iter(["seed"]));
    let config = DriverConfig {
        workers: 50,
        ..DriverConfig::default()
    };

    driver::append_with_tasks(Arc::clone(&store), &config).await?;

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 51);
    assert_eq!(snapshot[0], "seed");
    assert_eq!(sorted(snapshot[1..].to_vec()), expected_markers(&config));
    Ok(())
}

#[test]
fn threads_and_rayon_share_one_store() -> Result<()> {
    let store = Arc::new(SequenceStore::new());
    let threads = DriverConfig {
        workers: 5,
        prefix: "T".into(),
        ..DriverConfig::default()
    };
    let rayon = DriverConfig {
        workers: 5,
        prefix: "R".into(),
        ..DriverConfig::default()
    };

    driver::append_with_threads(&store, &threads)?;
    driver::append_with_rayon(&store, &rayon)?;

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 10);
    assert!(snapshot[..5].iter().all(|item| item.starts_with("T ")));
    assert!(snapshot[5..].iter().all(|item| item.starts_with("R ")));
    Ok(())
}
