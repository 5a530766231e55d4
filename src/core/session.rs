//! Async driver around [`Battle`].
//!
//! The session is the only writer. The lock is held for the synchronous parts
//! of a turn and released while the oracle is consulted, so snapshots stay
//! readable during the wait; the battle's `Resolving` phase keeps new player
//! input out until the opponent's move lands.
//!
//! Once opened, an opponent turn is driven to completion on its own task, so
//! a caller that stops waiting cannot leave the battle stuck in `Resolving`.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};

use crate::ai::oracle::{DecisionOracle, OracleDecision};
use crate::config::BattleConfig;
use crate::core::battle::{Battle, OpponentTurn, TurnReport};
use crate::core::cues::{Cue, CueSink};
use crate::core::state::{BattleState, Phase, Side};
use crate::core::utils::{random_source, RandomSource};
use crate::data::Catalog;
use crate::error::{DataError, OracleError};

struct Inner {
    battle: Battle,
    rng: RandomSource,
    next_generation: u64,
}

pub struct BattleSession {
    catalog: Arc<Catalog>,
    oracle: Arc<dyn DecisionOracle>,
    cues: Arc<dyn CueSink>,
    config: BattleConfig,
    inner: Arc<Mutex<Inner>>,
}

impl BattleSession {
    pub fn new(
        catalog: Arc<Catalog>,
        oracle: Arc<dyn DecisionOracle>,
        cues: Arc<dyn CueSink>,
        config: BattleConfig,
    ) -> Result<Self, DataError> {
        let mut rng = random_source(config.seed);
        let battle = Battle::start(&catalog, rng.as_mut(), 0)?;
        cues.play(Cue::Start);
        Ok(Self {
            catalog,
            oracle,
            cues,
            config,
            inner: Arc::new(Mutex::new(Inner {
                battle,
                rng,
                next_generation: 1,
            })),
        })
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub async fn snapshot(&self) -> BattleState {
        self.inner.lock().await.battle.state().clone()
    }

    pub async fn phase(&self) -> Phase {
        self.inner.lock().await.battle.phase()
    }

    pub async fn generation(&self) -> u64 {
        self.inner.lock().await.battle.generation()
    }

    /// Resolves only the player's half of a turn. `None` means the move was
    /// ignored: wrong phase, a turn already in flight, the battle is over, or
    /// the index is not in the moveset.
    ///
    /// The battle is left in `AwaitingOpponentAction`; follow up with
    /// [`run_opponent_turn`](Self::run_opponent_turn), or use
    /// [`play_turn`](Self::play_turn) for both halves.
    pub async fn submit_player_move(&self, move_index: usize) -> Option<TurnReport> {
        let report = {
            let mut inner = self.inner.lock().await;
            let Inner { battle, rng, .. } = &mut *inner;
            battle.submit_player_move(move_index, rng.as_mut())?
        };
        self.emit(&report);
        Some(report)
    }

    /// Resolves the opponent's half of a turn through the oracle. Never stalls
    /// past `oracle_timeout` plus `think_delay`.
    ///
    /// The turn keeps going if this future is dropped; its result then only
    /// shows up in the state.
    pub async fn run_opponent_turn(&self) -> Option<TurnReport> {
        let turn = self.inner.lock().await.battle.begin_opponent_turn()?;

        let driver = OpponentDriver {
            inner: self.inner.clone(),
            oracle: self.oracle.clone(),
            cues: self.cues.clone(),
            oracle_timeout: self.config.oracle_timeout,
            think_delay: self.config.think_delay,
        };
        match tokio::spawn(driver.run(turn)).await {
            Ok(report) => report,
            Err(err) => {
                warn!(error = %err, "opponent turn task failed");
                None
            }
        }
    }

    /// Player half, then the opponent's reply unless the battle just ended.
    pub async fn play_turn(&self, move_index: usize) -> Vec<TurnReport> {
        let mut reports = Vec::with_capacity(2);
        let Some(report) = self.submit_player_move(move_index).await else {
            return reports;
        };
        let finished = report.winner.is_some();
        reports.push(report);

        if !finished {
            if let Some(reply) = self.run_opponent_turn().await {
                reports.push(reply);
            }
        }
        reports
    }

    /// Throws the current battle away and starts a new one. Any decision still
    /// pending for the old battle is dropped when it arrives.
    pub async fn reset(&self) -> Result<(), DataError> {
        let mut inner = self.inner.lock().await;
        let generation = inner.next_generation;
        let battle = Battle::start(&self.catalog, inner.rng.as_mut(), generation)?;
        inner.battle = battle;
        inner.next_generation += 1;
        drop(inner);

        info!(generation, "battle reset");
        self.cues.play(Cue::Start);
        Ok(())
    }

    pub fn shutdown(&self) {
        self.cues.shutdown();
    }

    fn emit(&self, report: &TurnReport) {
        emit(self.cues.as_ref(), report);
    }
}

/// Everything an opponent turn needs once it leaves the caller's future.
struct OpponentDriver {
    inner: Arc<Mutex<Inner>>,
    oracle: Arc<dyn DecisionOracle>,
    cues: Arc<dyn CueSink>,
    oracle_timeout: Duration,
    think_delay: Duration,
}

impl OpponentDriver {
    async fn run(self, turn: OpponentTurn) -> Option<TurnReport> {
        if !self.think_delay.is_zero() {
            sleep(self.think_delay).await;
        }

        let outcome = self.consult(&turn).await;

        let report = {
            let mut inner = self.inner.lock().await;
            let Inner { battle, rng, .. } = &mut *inner;
            battle.complete_opponent_turn(turn, outcome, rng.as_mut())?
        };
        emit(self.cues.as_ref(), &report);
        Some(report)
    }

    /// The oracle runs on its own task; a panicking oracle counts as a failed one.
    async fn consult(&self, turn: &OpponentTurn) -> Result<OracleDecision, OracleError> {
        let oracle = self.oracle.clone();
        let context = turn.context().clone();
        let mut call = tokio::spawn(async move { oracle.choose_move(&context).await });

        match timeout(self.oracle_timeout, &mut call).await {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => Err(OracleError::Unavailable(format!("oracle task failed: {err}"))),
            Err(_) => {
                call.abort();
                Err(OracleError::Timeout(self.oracle_timeout))
            }
        }
    }
}

fn emit(cues: &dyn CueSink, report: &TurnReport) {
    cues.play(Cue::Attack);
    cues.play(Cue::Hit);
    if let Some(winner) = report.winner {
        cues.play(Cue::Faint);
        if winner == Side::Player {
            cues.play(Cue::Win);
        }
    }
}
