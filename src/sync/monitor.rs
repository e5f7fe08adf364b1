//! Background consistency monitor.
//!
//! The replication backend writes to the local store on its own schedule.
//! The monitor makes sure views notice: it re-reads the store on a timer,
//! whenever the backend reports applied remote changes, and whenever the
//! application comes to the foreground. Every successful read bumps a
//! monotonically increasing refresh trigger that observers watch.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::remote::RemoteChange;
use crate::db::MealRepository;
use crate::error::{StoreError, SyncCheckFailure};

const TICK_CAPACITY: usize = 16;
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// What the monitor reads from.
#[async_trait]
pub trait SyncSource: Send + Sync {
    /// Full re-read of the current meal set. Returns the number of meals.
    async fn fetch_for_sync(&self) -> Result<usize, StoreError>;

    /// Notifications of remote rows applied by the replication backend.
    fn remote_changes(&self) -> broadcast::Receiver<RemoteChange>;
}

#[async_trait]
impl SyncSource for MealRepository {
    async fn fetch_for_sync(&self) -> Result<usize, StoreError> {
        Ok(self.list().await?.len())
    }

    fn remote_changes(&self) -> broadcast::Receiver<RemoteChange> {
        MealRepository::remote_changes(self).subscribe()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Checking,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncState::Idle => write!(f, "idle"),
            SyncState::Checking => write!(f, "checking"),
        }
    }
}

/// Published after every successful check.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncTick {
    pub refresh_trigger: u64,
    pub last_sync: DateTime<Utc>,
    pub meal_count: usize,
}

struct Status {
    state: SyncState,
    in_flight: usize,
    last_sync: Option<DateTime<Utc>>,
}

struct Shared {
    interval: Duration,
    source: Mutex<Option<Arc<dyn SyncSource>>>,
    status: Mutex<Status>,
    refresh_trigger: AtomicU64,
    ticks: broadcast::Sender<SyncTick>,
}

pub struct SyncMonitor {
    shared: Arc<Shared>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncMonitor {
    /// A zero `interval` is raised to one millisecond.
    pub fn new(interval: Duration) -> Self {
        let (ticks, _) = broadcast::channel(TICK_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                interval: interval.max(MIN_INTERVAL),
                source: Mutex::new(None),
                status: Mutex::new(Status {
                    state: SyncState::Idle,
                    in_flight: 0,
                    last_sync: None,
                }),
                refresh_trigger: AtomicU64::new(0),
                ticks,
            }),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Starts watching `source`. The first timed check runs immediately.
    /// Calling this on a running monitor restarts it against the new source.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, source: Arc<dyn SyncSource>) {
        self.stop();

        let changes = source.remote_changes();
        *lock(&self.shared.source) = Some(source);

        let listener = tokio::spawn(listen_for_changes(Arc::clone(&self.shared), changes));
        let timer = tokio::spawn(run_timer(Arc::clone(&self.shared)));
        lock(&self.tasks).extend([listener, timer]);

        tracing::info!(
            "Sync monitor started (every {}s)",
            self.shared.interval.as_secs_f64()
        );
    }

    /// Stops the timer and the remote-change listener. Checks already in
    /// flight run to completion.
    pub fn stop(&self) {
        let handles: Vec<JoinHandle<()>> = lock(&self.tasks).drain(..).collect();
        lock(&self.shared.source).take();

        if handles.is_empty() {
            return;
        }
        for handle in handles {
            handle.abort();
        }
        tracing::info!("Sync monitor stopped");
    }

    /// The application came to the foreground.
    pub fn app_became_active(&self) {
        tracing::debug!("App became active, checking for updates");
        self.spawn_check();
    }

    /// Re-reads the store once. On success returns the new refresh trigger.
    pub async fn check_for_updates(&self) -> Result<u64, SyncCheckFailure> {
        self.shared.check().await
    }

    /// Runs [`check_for_updates`](Self::check_for_updates) on its own task.
    pub fn spawn_check(&self) -> JoinHandle<Result<u64, SyncCheckFailure>> {
        Shared::spawn_check(&self.shared)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncTick> {
        self.shared.ticks.subscribe()
    }

    pub fn state(&self) -> SyncState {
        lock(&self.shared.status).state
    }

    pub fn refresh_trigger(&self) -> u64 {
        self.shared.refresh_trigger.load(Ordering::SeqCst)
    }

    pub fn last_sync_date(&self) -> Option<DateTime<Utc>> {
        lock(&self.shared.status).last_sync
    }

    pub fn is_running(&self) -> bool {
        !lock(&self.tasks).is_empty()
    }

    pub fn interval(&self) -> Duration {
        self.shared.interval
    }
}

impl Drop for SyncMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    fn spawn_check(shared: &Arc<Shared>) -> JoinHandle<Result<u64, SyncCheckFailure>> {
        let shared = Arc::clone(shared);
        tokio::spawn(async move { shared.check().await })
    }

    async fn check(&self) -> Result<u64, SyncCheckFailure> {
        let source = lock(&self.source)
            .clone()
            .ok_or(SyncCheckFailure::NotStarted)?;

        let _in_flight = InFlight::enter(self);

        match source.fetch_for_sync().await {
            Ok(meal_count) => {
                let trigger = self.refresh_trigger.fetch_add(1, Ordering::SeqCst) + 1;
                let now = {
                    let mut status = lock(&self.status);
                    // Overlapping checks finish in any order; never move backwards
                    let now = match status.last_sync {
                        Some(previous) => previous.max(Utc::now()),
                        None => Utc::now(),
                    };
                    status.last_sync = Some(now);
                    now
                };

                tracing::debug!("Sync check #{} read {} meals", trigger, meal_count);
                // No subscribers is fine
                let _ = self.ticks.send(SyncTick {
                    refresh_trigger: trigger,
                    last_sync: now,
                    meal_count,
                });
                Ok(trigger)
            }
            Err(e) => {
                let failure = SyncCheckFailure::from(e);
                tracing::warn!("{}", failure);
                Err(failure)
            }
        }
    }
}

/// Marks a check as running; the monitor is `Checking` while any exist.
struct InFlight<'a> {
    shared: &'a Shared,
}

impl<'a> InFlight<'a> {
    fn enter(shared: &'a Shared) -> Self {
        let mut status = lock(&shared.status);
        status.in_flight += 1;
        status.state = SyncState::Checking;
        Self { shared }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut status = lock(&self.shared.status);
        status.in_flight -= 1;
        if status.in_flight == 0 {
            status.state = SyncState::Idle;
        }
    }
}

async fn run_timer(shared: Arc<Shared>) {
    let mut ticker = tokio::time::interval(shared.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        // Each tick gets its own task so a slow read never holds up the next one
        Shared::spawn_check(&shared);
    }
}

async fn listen_for_changes(shared: Arc<Shared>, mut changes: broadcast::Receiver<RemoteChange>) {
    loop {
        match changes.recv().await {
            Ok(change) => {
                tracing::debug!(
                    "Remote change received ({} meals), checking for updates",
                    change.meal_ids.len()
                );
                Shared::spawn_check(&shared);
            }
            Err(RecvError::Lagged(missed)) => {
                tracing::debug!("Missed {} remote change notifications", missed);
                Shared::spawn_check(&shared);
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::models::Meal;
    use crate::sync::RemoteChangeFeed;
    use std::sync::atomic::AtomicUsize;
    use tempfile::TempDir;
    use tokio::sync::Semaphore;
    use uuid::Uuid;

    const LONG: Duration = Duration::from_secs(3600);

    /// Succeeds after acquiring a permit, so tests decide when reads finish.
    struct GatedSource {
        gate: Semaphore,
        calls: AtomicUsize,
        feed: RemoteChangeFeed,
    }

    impl GatedSource {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                gate: Semaphore::new(0),
                calls: AtomicUsize::new(0),
                feed: RemoteChangeFeed::new(),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SyncSource for GatedSource {
        async fn fetch_for_sync(&self) -> Result<usize, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.acquire().await.unwrap().forget();
            Ok(3)
        }

        fn remote_changes(&self) -> broadcast::Receiver<RemoteChange> {
            self.feed.subscribe()
        }
    }

    struct FailingSource {
        calls: AtomicUsize,
        feed: RemoteChangeFeed,
    }

    #[async_trait]
    impl SyncSource for FailingSource {
        async fn fetch_for_sync(&self) -> Result<usize, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::NotFound(Uuid::nil()))
        }

        fn remote_changes(&self) -> broadcast::Receiver<RemoteChange> {
            self.feed.subscribe()
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    async fn next_tick(ticks: &mut broadcast::Receiver<SyncTick>) -> SyncTick {
        tokio::time::timeout(Duration::from_secs(5), ticks.recv())
            .await
            .expect("no tick in time")
            .unwrap()
    }

    #[tokio::test]
    async fn test_check_before_start_fails() {
        let monitor = SyncMonitor::new(LONG);
        let result = monitor.check_for_updates().await;
        assert!(matches!(result, Err(SyncCheckFailure::NotStarted)));
        assert_eq!(monitor.refresh_trigger(), 0);
        assert_eq!(monitor.state(), SyncState::Idle);
    }

    #[tokio::test]
    async fn test_start_checks_immediately() {
        let source = GatedSource::new();
        source.gate.add_permits(10);
        let monitor = SyncMonitor::new(LONG);
        let mut ticks = monitor.subscribe();

        monitor.start(source.clone());
        assert!(monitor.is_running());

        let tick = next_tick(&mut ticks).await;
        assert_eq!(tick.refresh_trigger, 1);
        assert_eq!(tick.meal_count, 3);
        assert_eq!(monitor.last_sync_date(), Some(tick.last_sync));
    }

    #[tokio::test]
    async fn test_overlapping_checks_each_increment_once() {
        let source = GatedSource::new();
        let monitor = SyncMonitor::new(LONG);
        let mut ticks = monitor.subscribe();
        monitor.start(source.clone());

        // Let the immediate timer check finish first
        wait_until(|| source.calls() == 1).await;
        source.gate.add_permits(1);
        next_tick(&mut ticks).await;
        wait_until(|| monitor.state() == SyncState::Idle).await;
        let baseline = monitor.refresh_trigger();
        assert_eq!(baseline, 1);

        let handles: Vec<_> = (0..3).map(|_| monitor.spawn_check()).collect();
        wait_until(|| source.calls() == 4).await;
        assert_eq!(monitor.state(), SyncState::Checking);
        assert_eq!(monitor.refresh_trigger(), baseline);

        source.gate.add_permits(3);
        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap().unwrap());
        }
        results.sort_unstable();

        assert_eq!(results, vec![baseline + 1, baseline + 2, baseline + 3]);
        assert_eq!(monitor.refresh_trigger(), baseline + 3);
        assert_eq!(monitor.state(), SyncState::Idle);
    }

    #[tokio::test]
    async fn test_last_sync_date_never_moves_backwards() {
        let source = GatedSource::new();
        let monitor = SyncMonitor::new(LONG);
        let mut ticks = monitor.subscribe();
        monitor.start(source.clone());

        wait_until(|| source.calls() == 1).await;
        source.gate.add_permits(1);
        let first = next_tick(&mut ticks).await;

        let handles: Vec<_> = (0..8).map(|_| monitor.spawn_check()).collect();
        wait_until(|| source.calls() == 9).await;
        source.gate.add_permits(8);
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut latest = first.last_sync;
        for _ in 0..8 {
            let tick = next_tick(&mut ticks).await;
            assert!(tick.last_sync >= first.last_sync);
            latest = latest.max(tick.last_sync);
        }
        assert_eq!(monitor.last_sync_date(), Some(latest));
    }

    #[tokio::test]
    async fn test_failed_check_does_not_increment() {
        let source = Arc::new(FailingSource {
            calls: AtomicUsize::new(0),
            feed: RemoteChangeFeed::new(),
        });
        let monitor = SyncMonitor::new(LONG);
        monitor.start(source.clone());

        let result = monitor.check_for_updates().await;
        assert!(matches!(result, Err(SyncCheckFailure::Read(_))));

        wait_until(|| {
            source.calls.load(Ordering::SeqCst) >= 2 && monitor.state() == SyncState::Idle
        })
        .await;
        assert_eq!(monitor.refresh_trigger(), 0);
        assert!(monitor.last_sync_date().is_none());
    }

    #[tokio::test]
    async fn test_remote_change_triggers_check() {
        let source = GatedSource::new();
        source.gate.add_permits(10);
        let monitor = SyncMonitor::new(LONG);
        let mut ticks = monitor.subscribe();
        monitor.start(source.clone());
        next_tick(&mut ticks).await;

        assert_eq!(source.feed.notify(RemoteChange::new(vec![Uuid::new_v4()])), 1);

        let tick = next_tick(&mut ticks).await;
        assert_eq!(tick.refresh_trigger, 2);
    }

    #[tokio::test]
    async fn test_app_became_active_triggers_check() {
        let source = GatedSource::new();
        source.gate.add_permits(10);
        let monitor = SyncMonitor::new(LONG);
        let mut ticks = monitor.subscribe();
        monitor.start(source);
        next_tick(&mut ticks).await;

        monitor.app_became_active();

        assert_eq!(next_tick(&mut ticks).await.refresh_trigger, 2);
    }

    #[tokio::test]
    async fn test_timer_repeats() {
        let source = GatedSource::new();
        source.gate.add_permits(100);
        let monitor = SyncMonitor::new(Duration::from_millis(10));
        monitor.start(source);

        wait_until(|| monitor.refresh_trigger() >= 3).await;
        monitor.stop();
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let source = GatedSource::new();
        source.gate.add_permits(10);
        let monitor = SyncMonitor::new(LONG);

        monitor.stop();
        monitor.start(source.clone());
        monitor.stop();
        monitor.stop();

        assert!(!monitor.is_running());
        assert!(matches!(
            monitor.check_for_updates().await,
            Err(SyncCheckFailure::NotStarted)
        ));
    }

    #[tokio::test]
    async fn test_restart_replaces_source() {
        let first = GatedSource::new();
        let second = GatedSource::new();
        second.gate.add_permits(10);
        let monitor = SyncMonitor::new(LONG);
        let mut ticks = monitor.subscribe();

        monitor.start(first.clone());
        monitor.start(second.clone());

        assert!(monitor.is_running());
        assert_eq!(next_tick(&mut ticks).await.meal_count, 3);
        monitor.check_for_updates().await.unwrap();
        assert!(second.calls() >= 2);
    }

    #[tokio::test]
    async fn test_monitor_reads_meal_repository() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();
        let repo = MealRepository::new(pool);
        repo.create(&Meal::new("Breakfast")).await.unwrap();
        repo.create(&Meal::new("Lunch")).await.unwrap();

        let monitor = SyncMonitor::new(LONG);
        let mut ticks = monitor.subscribe();
        monitor.start(Arc::new(repo.clone()));

        assert_eq!(next_tick(&mut ticks).await.meal_count, 2);

        // Simulate the replication backend applying a remote row
        let remote = Meal::new("Dinner from phone");
        repo.create(&remote).await.unwrap();
        repo.remote_changes().notify(RemoteChange::new(vec![remote.id]));

        let tick = next_tick(&mut ticks).await;
        assert_eq!(tick.meal_count, 3);
        assert_eq!(tick.refresh_trigger, 2);
    }
}
