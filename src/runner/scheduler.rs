//! The two long-running tasks: fetch and decide-and-send.
//!
//! The fetch task polls the arena on its own cadence and publishes
//! snapshots into the cache. The decide task wakes every tick, decides for
//! whatever snapshot is current, and submits the assembled commands on the
//! send cadence. Both tasks watch the shutdown flag at their wait points
//! and exit between cycles, never mid-request.

use crate::core::config::BotConfig;
use crate::core::error::BotError;
use crate::engine::{assembler, Engine};
use crate::net::{ApiClient, MoveRequest};
use crate::runner::budget::ErrorBudget;
use crate::runner::cache::{SnapshotCache, StatusHandle};
use crate::runner::cadence::Cadence;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

pub struct Scheduler {
    cfg: Arc<BotConfig>,
    client: Arc<ApiClient>,
    engine: Arc<Engine>,
    cache: SnapshotCache,
    status: StatusHandle,
    shutdown: watch::Receiver<bool>,
}

impl Scheduler {
    pub fn new(
        cfg: Arc<BotConfig>,
        client: ApiClient,
        engine: Engine,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            cfg,
            client: Arc::new(client),
            engine: Arc::new(engine),
            cache: SnapshotCache::new(),
            status: StatusHandle::new(),
            shutdown,
        }
    }

    pub fn status(&self) -> StatusHandle {
        self.status.clone()
    }

    /// Read-only handle onto the published snapshots, for external
    /// observers.
    pub fn snapshots(&self) -> SnapshotCache {
        self.cache.clone()
    }

    /// Runs both loops until shutdown is signalled. Nothing short of that
    /// ends the run; every per-cycle failure is absorbed and logged.
    pub async fn run(self) {
        info!(strategy = self.engine.strategy_name(), "bot starting");
        let fetch = tokio::spawn(fetch_loop(
            self.cfg.clone(),
            self.client.clone(),
            self.cache.clone(),
            self.status.clone(),
            self.shutdown.clone(),
        ));
        let decide = tokio::spawn(decide_loop(
            self.cfg.clone(),
            self.client.clone(),
            self.engine.clone(),
            self.cache.clone(),
            self.status.clone(),
            self.shutdown.clone(),
        ));
        let _ = fetch.await;
        let _ = decide.await;
        info!("bot stopped");
    }
}

async fn fetch_loop(
    cfg: Arc<BotConfig>,
    client: Arc<ApiClient>,
    cache: SnapshotCache,
    status: StatusHandle,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut cadence = Cadence::new(Duration::from_millis(cfg.read_interval_ms));
    let mut budget = ErrorBudget::new(cfg.error_budget);
    let mut last_round = String::new();

    loop {
        let delay = cadence.delay_from(Instant::now());
        if wait_or_shutdown(&mut shutdown, delay).await {
            return;
        }

        match fetch_once(&cfg, &client, &mut cadence).await {
            Ok(state) => {
                budget.record_success();
                status.set_error(None);
                if state.round != last_round {
                    info!(round = %state.round, score = state.raw_score, "round changed");
                    last_round = state.round.clone();
                }
                debug!(
                    units = state.units.len(),
                    obstacles = state.obstacles.len(),
                    bombs = state.bombs.len(),
                    "snapshot published"
                );
                cache.publish(state);
            }
            Err(e) => {
                status.set_error(Some(e.to_string()));
                match &e {
                    // Stale-but-valid beats fresh-but-wrong: keep serving
                    // the previous snapshot.
                    BotError::Malformed(msg) => {
                        warn!(%msg, "malformed arena payload, keeping previous snapshot");
                    }
                    BotError::Auth(msg) => {
                        error!(%msg, "authentication rejected");
                    }
                    other => {
                        warn!(error = %other, consecutive = budget.consecutive() + 1, "arena fetch failed");
                    }
                }
                if failure_trips_budget(&mut budget, &e) {
                    cooldown(&cfg, &mut budget, &mut shutdown).await;
                }
            }
        }

        if *shutdown.borrow() {
            return;
        }
    }
}

/// One fetch with capped retries. Only transient errors are retried, and
/// every attempt (retries included) goes through the cadence so a fast
/// failure cannot push the loop over the server's rate limit.
async fn fetch_once(
    cfg: &BotConfig,
    client: &ApiClient,
    cadence: &mut Cadence,
) -> crate::core::error::Result<crate::state::model::ArenaState> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        cadence.pace().await;
        match client.fetch_arena().await {
            Ok(body) => return Ok(body.into_state(cfg.default_bomb_radius)),
            Err(e) if e.is_transient() && attempt < cfg.max_attempts => {
                debug!(error = %e, attempt, "retrying arena fetch");
            }
            Err(e) => return Err(e),
        }
    }
}

async fn decide_loop(
    cfg: Arc<BotConfig>,
    client: Arc<ApiClient>,
    engine: Arc<Engine>,
    cache: SnapshotCache,
    status: StatusHandle,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut tick = tokio::time::interval(Duration::from_millis(cfg.tick_ms));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut send_cadence = Cadence::new(Duration::from_millis(cfg.send_interval_ms));
    let mut budget = ErrorBudget::new(cfg.error_budget);

    loop {
        tokio::select! {
            _ = tick.tick() => {}
            _ = shutdown.changed() => {}
        }
        if *shutdown.borrow() {
            return;
        }

        let Some(state) = cache.latest() else {
            debug!("no snapshot yet, skipping tick");
            continue;
        };

        let started = Instant::now();
        let decisions = engine.decide(&state);
        let commands = assembler::assemble(&state, &decisions, &cfg);
        status.set_cycle_ms(started.elapsed().as_millis() as u64);

        if commands.is_empty() {
            debug!("no controllable units, nothing to send");
            continue;
        }

        let delay = send_cadence.delay_from(Instant::now());
        if wait_or_shutdown(&mut shutdown, delay).await {
            return;
        }

        match send_once(&cfg, &client, &decisions, commands, &mut send_cadence).await {
            Ok(response) => {
                budget.record_success();
                status.set_send_code(response.code);
                if !response.errors.is_empty() {
                    warn!(code = response.code, errors = ?response.errors, "move rejected in part");
                }
            }
            Err(e) => {
                status.set_error(Some(e.to_string()));
                warn!(error = %e, consecutive = budget.consecutive() + 1, "move submit failed");
                if failure_trips_budget(&mut budget, &e) {
                    cooldown(&cfg, &mut budget, &mut shutdown).await;
                }
            }
        }
    }
}

async fn send_once(
    cfg: &BotConfig,
    client: &ApiClient,
    decisions: &[crate::engine::UnitDecision],
    commands: Vec<crate::net::UnitCommand>,
    cadence: &mut Cadence,
) -> crate::core::error::Result<crate::net::MoveResponse> {
    for d in decisions {
        debug!(unit = %d.unit, rule = ?d.decision.rule, "decision");
    }
    let request = MoveRequest { bombers: commands };
    let mut attempt = 0;
    loop {
        attempt += 1;
        cadence.pace().await;
        match client.send_move(&request).await {
            Ok(response) => return Ok(response),
            Err(e) if e.is_transient() && attempt < cfg.max_attempts => {
                debug!(error = %e, attempt, "retrying move submit");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Shared budget accounting for both loops: only transient failures count.
/// A malformed body means the server answered, so hammering it faster will
/// not help and the budget stays untouched.
fn failure_trips_budget(budget: &mut ErrorBudget, e: &BotError) -> bool {
    if e.is_transient() {
        budget.record_failure()
    } else {
        false
    }
}

async fn cooldown(cfg: &BotConfig, budget: &mut ErrorBudget, shutdown: &mut watch::Receiver<bool>) {
    warn!(
        consecutive = budget.consecutive(),
        cooldown_ms = cfg.cooldown_ms,
        "error budget exhausted, backing off"
    );
    let _ = wait_or_shutdown(shutdown, Duration::from_millis(cfg.cooldown_ms)).await;
    budget.reset();
}

/// Sleeps for `delay`, returning early (and true) if shutdown fires.
async fn wait_or_shutdown(shutdown: &mut watch::Receiver<bool>, delay: Duration) -> bool {
    if *shutdown.borrow() {
        return true;
    }
    if delay.is_zero() {
        return false;
    }
    tokio::select! {
        _ = tokio::time::sleep(delay) => false,
        _ = shutdown.changed() => *shutdown.borrow(),
    }
}
