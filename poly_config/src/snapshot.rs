//! Published configuration snapshots and reloads.
//!
//! Readers load the current [`Snapshot`] without locking. A reload builds a
//! candidate off to the side and swaps it in only when its pass produced no
//! blocking errors; otherwise the previous snapshot stays authoritative.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;

use crate::engine::ConfigEngine;
use crate::error::{DecodeResult, ErrorKind, ErrorReport, PolyError, PolyResult, ValidationError};
use crate::path::CanonicalPath;
use crate::source::Sources;

/// One immutable, fully decoded configuration.
#[derive(Debug)]
pub struct Snapshot<T> {
    generation: u64,
    config: T,
    report: ErrorReport,
}

impl<T> Snapshot<T> {
    /// Position in the sequence of successful loads, starting at 1.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The decoded configuration.
    #[must_use]
    pub const fn config(&self) -> &T {
        &self.config
    }

    /// Informational entries of the pass that produced this snapshot.
    #[must_use]
    pub const fn report(&self) -> &ErrorReport {
        &self.report
    }
}

impl<T> std::ops::Deref for Snapshot<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.config
    }
}

type Listener<T> = Arc<dyn Fn(&Arc<Snapshot<T>>) + Send + Sync>;

/// Holds the active snapshot and serialises reloads.
pub struct SnapshotManager<T> {
    current: ArcSwapOption<Snapshot<T>>,
    reload_guard: Mutex<()>,
    listeners: RwLock<Vec<Listener<T>>>,
}

impl<T> Default for SnapshotManager<T> {
    fn default() -> Self {
        Self {
            current: ArcSwapOption::empty(),
            reload_guard: Mutex::new(()),
            listeners: RwLock::new(Vec::new()),
        }
    }
}

impl<T> std::fmt::Debug for SnapshotManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotManager")
            .field("generation", &self.current().map(|snapshot| snapshot.generation))
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}

impl<T> SnapshotManager<T> {
    /// Manager with nothing loaded yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active snapshot, if a load has succeeded.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Snapshot<T>>> {
        self.current.load_full()
    }

    /// Active snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::NotLoaded`] before the first successful load.
    pub fn get(&self) -> PolyResult<Arc<Snapshot<T>>> {
        self.current().ok_or(PolyError::NotLoaded)
    }

    /// Call `listener` after every successful swap.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&Arc<Snapshot<T>>) + Send + Sync + 'static,
    {
        self.listeners.write().push(Arc::new(listener));
    }

    /// Run `pass` and publish its value when the pass produced no blocking
    /// errors.
    ///
    /// Reloads are serialised: a second caller waits for the first to finish
    /// before running its own pass. Listeners run after the reload lock is
    /// released, so they may reload or subscribe themselves.
    ///
    /// # Errors
    ///
    /// Propagates errors returned by `pass`. A blocking report is returned as
    /// [`PolyError::Initialization`] when nothing was loaded before and as
    /// [`PolyError::Rejected`] otherwise; the active snapshot is untouched in
    /// both cases.
    pub fn reload_with<F>(&self, pass: F) -> PolyResult<Arc<Snapshot<T>>>
    where
        F: FnOnce() -> PolyResult<DecodeResult<T>>,
    {
        let snapshot = self.publish(pass)?;
        let listeners: Vec<Listener<T>> = self.listeners.read().clone();
        for listener in &listeners {
            listener(&snapshot);
        }
        Ok(snapshot)
    }

    fn publish<F>(&self, pass: F) -> PolyResult<Arc<Snapshot<T>>>
    where
        F: FnOnce() -> PolyResult<DecodeResult<T>>,
    {
        let _reloading = self.reload_guard.lock();
        let previous = self.current();
        let (value, errors) = pass()?.into_parts();
        let report = ErrorReport::from(errors);
        let config = match value {
            Some(config) if !report.is_blocking() => config,
            _ => return Err(reject(previous.is_some(), report)),
        };
        let generation = previous.map_or(1, |snapshot| snapshot.generation + 1);
        for entry in &report {
            tracing::debug!(path = %entry.path(), level = %entry.level(), "{}", entry.description());
        }
        let snapshot = Arc::new(Snapshot {
            generation,
            config,
            report,
        });
        self.current.store(Some(Arc::clone(&snapshot)));
        tracing::info!(generation, "configuration reloaded");
        Ok(snapshot)
    }
}

fn reject(had_snapshot: bool, mut report: ErrorReport) -> PolyError {
    if report.is_empty() {
        report.push(ValidationError::new(
            CanonicalPath::root(),
            ErrorKind::MissingValue,
            "snapshot",
        ));
    }
    for entry in &report {
        if entry.is_blocking() {
            tracing::error!(path = %entry.path(), source = entry.raised_by(), "{}", entry.description());
        } else {
            tracing::warn!(path = %entry.path(), source = entry.raised_by(), "{}", entry.description());
        }
    }
    if had_snapshot {
        tracing::error!(errors = report.len(), "configuration reload rejected; keeping the active snapshot");
        PolyError::Rejected(Box::new(report))
    } else {
        tracing::error!(errors = report.len(), "initial configuration load failed");
        PolyError::Initialization(Box::new(report))
    }
}

/// An engine, its sources and the snapshots they produce.
#[derive(Debug)]
pub struct ConfigProvider<T> {
    engine: ConfigEngine,
    sources: Sources,
    snapshots: SnapshotManager<T>,
}

impl<T: DeserializeOwned> ConfigProvider<T> {
    /// Provider with nothing loaded yet.
    #[must_use]
    pub fn new(engine: ConfigEngine, sources: Sources) -> Self {
        Self {
            engine,
            sources,
            snapshots: SnapshotManager::new(),
        }
    }

    /// Re-run the whole load pipeline and publish the result.
    ///
    /// # Errors
    ///
    /// See [`SnapshotManager::reload_with`]; unreadable sources surface as
    /// [`PolyError::File`].
    pub fn reload(&self) -> PolyResult<Arc<Snapshot<T>>> {
        self.snapshots.reload_with(|| self.engine.load(&self.sources))
    }

    /// Active snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::NotLoaded`] before the first successful load.
    pub fn get(&self) -> PolyResult<Arc<Snapshot<T>>> {
        self.snapshots.get()
    }

    /// Active snapshot, if any.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Snapshot<T>>> {
        self.snapshots.current()
    }

    /// Call `listener` after every successful reload.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&Arc<Snapshot<T>>) + Send + Sync + 'static,
    {
        self.snapshots.subscribe(listener);
    }

    /// The engine decoding every pass.
    #[must_use]
    pub const fn engine(&self) -> &ConfigEngine {
        &self.engine
    }

    /// Layered sources read by every pass.
    #[must_use]
    pub const fn sources(&self) -> &Sources {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn clean(value: u32) -> PolyResult<DecodeResult<u32>> {
        Ok(DecodeResult::ok(value))
    }

    fn blocking() -> PolyResult<DecodeResult<u32>> {
        Ok(DecodeResult::failed(
            &CanonicalPath::parse("health-multiplier"),
            ErrorKind::InvalidValue {
                value: "fast".into(),
                target: "float".into(),
            },
            "Float",
        ))
    }

    #[rstest]
    fn first_failure_is_an_initialization_error() {
        let manager = SnapshotManager::<u32>::new();
        let err = manager.reload_with(blocking).expect_err("blocking pass");
        assert!(matches!(err, PolyError::Initialization(_)));
        assert!(matches!(manager.get(), Err(PolyError::NotLoaded)));
    }

    #[rstest]
    fn rejected_reload_keeps_previous_snapshot() {
        let manager = SnapshotManager::new();
        manager.reload_with(|| clean(1)).expect("first load");
        let err = manager.reload_with(blocking).expect_err("blocking pass");
        assert_eq!(err.report().map(ErrorReport::len), Some(1));
        assert!(matches!(err, PolyError::Rejected(_)));
        let active = manager.get().expect("snapshot kept");
        assert_eq!((active.generation(), *active.config()), (1, 1));
    }

    #[rstest]
    fn value_with_blocking_errors_is_rejected() {
        let manager = SnapshotManager::new();
        let err = manager
            .reload_with(|| {
                Ok(DecodeResult::with_errors(
                    7,
                    vec![ValidationError::new(CanonicalPath::root(), ErrorKind::NullValue, "test")],
                ))
            })
            .expect_err("blocking entry");
        assert!(matches!(err, PolyError::Initialization(_)));
    }

    #[rstest]
    fn informational_entries_travel_with_the_snapshot() {
        let manager = SnapshotManager::new();
        let snapshot = manager
            .reload_with(|| {
                Ok(DecodeResult::with_errors(
                    3,
                    vec![ValidationError::new(
                        CanonicalPath::parse("mitosis"),
                        ErrorKind::MissingOptionalValue {
                            schema: "TowerConfig".into(),
                            component: "mitosis".into(),
                            default: Some("true".into()),
                        },
                        "TowerConfig",
                    )],
                ))
            })
            .expect("non-blocking pass");
        assert_eq!(snapshot.report().len(), 1);
        assert_eq!(*snapshot.config(), 3);
    }

    #[rstest]
    fn observers_see_each_published_generation() {
        let manager = SnapshotManager::new();
        let seen = Arc::new(AtomicU64::new(0));
        let sink = Arc::clone(&seen);
        manager.subscribe(move |snapshot: &Arc<Snapshot<u32>>| {
            sink.store(snapshot.generation(), Ordering::SeqCst);
        });
        manager.reload_with(|| clean(1)).expect("first load");
        manager.reload_with(|| clean(2)).expect("second load");
        let _rejected = manager.reload_with(blocking);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(**manager.get().expect("loaded"), 2);
    }

    #[rstest]
    fn listeners_may_reload_and_subscribe() {
        let manager = Arc::new(SnapshotManager::new());
        let seen = Arc::new(AtomicU64::new(0));
        let handle = Arc::downgrade(&manager);
        let sink = Arc::clone(&seen);
        manager.subscribe(move |snapshot: &Arc<Snapshot<u32>>| {
            let Some(manager) = handle.upgrade() else {
                return;
            };
            if snapshot.generation() == 1 {
                let late = Arc::clone(&sink);
                manager.subscribe(move |snapshot: &Arc<Snapshot<u32>>| {
                    late.store(snapshot.generation(), Ordering::SeqCst);
                });
                manager.reload_with(|| clean(10)).expect("nested reload");
            }
        });
        manager.reload_with(|| clean(1)).expect("first load");
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        let active = manager.get().expect("loaded");
        assert_eq!((active.generation(), *active.config()), (2, 10));
    }

    #[rstest]
    fn source_failures_propagate_unchanged() {
        let manager = SnapshotManager::<u32>::new();
        let err = manager
            .reload_with(|| {
                Err(PolyError::File {
                    path: "config.yaml".into(),
                    source: std::io::Error::other("denied"),
                })
            })
            .expect_err("file error");
        assert!(matches!(err, PolyError::File { .. }));
    }
}
