use async_trait::async_trait;
use battle_engine::ai::oracle::{DecisionContext, DecisionOracle, OracleDecision};
use battle_engine::ai::HighestPowerOracle;
use battle_engine::config::BattleConfig;
use battle_engine::core::battle::{Fallback, HESITATION_LINE, THINKING_LINE};
use battle_engine::core::cues::{Cue, CueSink, SilentCues};
use battle_engine::core::session::BattleSession;
use battle_engine::core::state::{Phase, Side};
use battle_engine::data::Catalog;
use battle_engine::error::OracleError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{sleep, timeout};

struct FailingOracle;

#[async_trait]
impl DecisionOracle for FailingOracle {
    async fn choose_move(&self, _context: &DecisionContext) -> Result<OracleDecision, OracleError> {
        Err(OracleError::Unavailable("offline".to_string()))
    }
}

struct HangingOracle;

#[async_trait]
impl DecisionOracle for HangingOracle {
    async fn choose_move(&self, _context: &DecisionContext) -> Result<OracleDecision, OracleError> {
        std::future::pending().await
    }
}

/// Answers with its first move after a fixed delay.
struct SlowOracle(Duration);

#[async_trait]
impl DecisionOracle for SlowOracle {
    async fn choose_move(&self, _context: &DecisionContext) -> Result<OracleDecision, OracleError> {
        sleep(self.0).await;
        Ok(OracleDecision::new(0, "Steady now."))
    }
}

struct PanickingOracle;

#[async_trait]
impl DecisionOracle for PanickingOracle {
    async fn choose_move(&self, _context: &DecisionContext) -> Result<OracleDecision, OracleError> {
        panic!("oracle blew up")
    }
}

/// Signals when it is consulted, then waits until released.
#[derive(Default)]
struct GatedOracle {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl DecisionOracle for GatedOracle {
    async fn choose_move(&self, _context: &DecisionContext) -> Result<OracleDecision, OracleError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(OracleDecision::new(0, "Too late!"))
    }
}

#[derive(Default)]
struct RecordingCues {
    played: Mutex<Vec<Cue>>,
    closed: AtomicBool,
}

impl RecordingCues {
    fn played(&self) -> Vec<Cue> {
        self.played.lock().unwrap().clone()
    }
}

impl CueSink for RecordingCues {
    fn play(&self, cue: Cue) {
        self.played.lock().unwrap().push(cue);
    }

    fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

fn config(oracle_timeout: Duration) -> BattleConfig {
    BattleConfig {
        oracle_timeout,
        think_delay: Duration::ZERO,
        seed: Some(42),
    }
}

fn session_with(oracle: Arc<dyn DecisionOracle>, cues: Arc<dyn CueSink>, oracle_timeout: Duration) -> BattleSession {
    let catalog = Arc::new(Catalog::load_default().expect("default catalog"));
    BattleSession::new(catalog, oracle, cues, config(oracle_timeout)).expect("session")
}

#[tokio::test]
async fn failing_oracle_never_stalls_the_battle() {
    let session = session_with(Arc::new(FailingOracle), Arc::new(SilentCues), Duration::from_secs(1));

    let finished = timeout(Duration::from_secs(5), async {
        for _ in 0..200 {
            if session.snapshot().await.winner().is_some() {
                break;
            }
            let reports = session.play_turn(0).await;
            if let Some(reply) = reports.get(1) {
                assert_eq!(reply.fallback, Some(Fallback::OracleFailed));
            }
        }
    })
    .await;
    assert!(finished.is_ok(), "battle did not finish in time");

    let state = session.snapshot().await;
    assert!(state.winner().is_some());
    assert!(matches!(state.phase, Phase::Terminal(_)));
    assert!(state.log.iter().any(|l| l == HESITATION_LINE));
    assert!(session.play_turn(0).await.is_empty());
}

#[tokio::test]
async fn hanging_oracle_is_cut_off_by_the_timeout() {
    let session = session_with(Arc::new(HangingOracle), Arc::new(SilentCues), Duration::from_millis(50));

    let reports = timeout(Duration::from_secs(5), session.play_turn(0))
        .await
        .expect("turn finished");
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1].attacker, Side::Opponent);
    assert_eq!(reports[1].fallback, Some(Fallback::OracleFailed));

    let state = session.snapshot().await;
    assert_eq!(state.phase, Phase::AwaitingPlayerAction);
    assert!(state.log.iter().any(|l| l == HESITATION_LINE));
}

#[tokio::test]
async fn reset_starts_fresh_battles() {
    let session = session_with(Arc::new(HighestPowerOracle::new()), Arc::new(SilentCues), Duration::from_secs(1));
    assert_eq!(session.generation().await, 0);
    session.play_turn(1).await;

    for expected_generation in 1..=2 {
        session.reset().await.expect("reset");
        let state = session.snapshot().await;
        assert_eq!(session.generation().await, expected_generation);
        assert_eq!(state.winner(), None);
        assert_eq!(state.turn(), Side::Player);
        assert_eq!(state.player.moves.len(), 4);
        assert_eq!(state.player_hp, state.player.max_hp);
        assert_eq!(state.opponent_hp, state.opponent.max_hp);
        assert_eq!(state.log.len(), 2);
        assert_eq!(state.log[1], format!("Go! {}!", state.player.name));
    }
}

#[tokio::test]
async fn reset_while_the_oracle_is_deciding_discards_its_answer() {
    let oracle = Arc::new(GatedOracle::default());
    let session = Arc::new(session_with(oracle.clone(), Arc::new(SilentCues), Duration::from_secs(5)));

    let turn = tokio::spawn({
        let session = session.clone();
        async move { session.play_turn(0).await }
    });

    oracle.entered.notified().await;

    // The lock is free while the oracle works.
    let pending = session.snapshot().await;
    assert_eq!(pending.phase, Phase::Resolving(Side::Opponent));
    assert_eq!(pending.log.last().map(String::as_str), Some(THINKING_LINE));
    assert!(session.submit_player_move(0).await.is_none());
    assert_eq!(session.snapshot().await.log, pending.log);

    session.reset().await.expect("reset");
    oracle.release.notify_one();

    let reports = timeout(Duration::from_secs(5), turn)
        .await
        .expect("turn finished")
        .expect("task joined");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].attacker, Side::Player);

    let state = session.snapshot().await;
    assert_eq!(session.generation().await, 1);
    assert_eq!(state.phase, Phase::AwaitingPlayerAction);
    assert_eq!(state.player_hp, state.player.max_hp);
    assert_eq!(state.log.len(), 2);
    assert!(!state.log.iter().any(|l| l.contains("Too late!")));
}

#[tokio::test]
async fn cues_follow_the_turn_and_shutdown_reaches_the_sink() {
    let cues = Arc::new(RecordingCues::default());
    let session = session_with(Arc::new(HighestPowerOracle::new()), cues.clone(), Duration::from_secs(1));
    assert_eq!(cues.played(), vec![Cue::Start]);

    let reports = session.play_turn(0).await;
    assert_eq!(reports.len(), 2);
    assert_eq!(
        cues.played(),
        vec![Cue::Start, Cue::Attack, Cue::Hit, Cue::Attack, Cue::Hit]
    );

    session.reset().await.unwrap();
    assert_eq!(cues.played().last(), Some(&Cue::Start));

    assert!(!cues.closed.load(Ordering::SeqCst));
    session.shutdown();
    assert!(cues.closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn seeded_sessions_play_the_same_battle() {
    let a = session_with(Arc::new(HighestPowerOracle::new()), Arc::new(SilentCues), Duration::from_secs(1));
    let b = session_with(Arc::new(HighestPowerOracle::new()), Arc::new(SilentCues), Duration::from_secs(1));

    a.play_turn(2).await;
    b.play_turn(2).await;
    assert_eq!(a.snapshot().await, b.snapshot().await);
}

async fn wait_for_phase(session: &BattleSession, phase: Phase) -> bool {
    timeout(Duration::from_secs(5), async {
        while session.phase().await != phase {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .is_ok()
}

#[tokio::test]
async fn dropping_a_turn_mid_decision_still_resolves_it() {
    let session = session_with(
        Arc::new(SlowOracle(Duration::from_millis(200))),
        Arc::new(SilentCues),
        Duration::from_secs(5),
    );

    assert!(timeout(Duration::from_millis(20), session.play_turn(0)).await.is_err());
    assert_eq!(session.phase().await, Phase::Resolving(Side::Opponent));

    assert!(wait_for_phase(&session, Phase::AwaitingPlayerAction).await);
    let state = session.snapshot().await;
    assert!(state.log.iter().any(|l| l == "Trainer: \"Steady now.\""));
    assert!(state.player_hp < state.player.max_hp);

    assert!(!session.play_turn(1).await.is_empty());
}

#[tokio::test]
async fn halves_can_be_driven_separately() {
    let session = session_with(Arc::new(HighestPowerOracle::new()), Arc::new(SilentCues), Duration::from_secs(1));

    let player = session.submit_player_move(0).await.expect("player half");
    assert_eq!(player.attacker, Side::Player);
    assert_eq!(session.phase().await, Phase::AwaitingOpponentAction);
    assert!(session.submit_player_move(0).await.is_none());

    let reply = session.run_opponent_turn().await.expect("opponent half");
    assert_eq!(reply.attacker, Side::Opponent);
    assert_eq!(session.phase().await, Phase::AwaitingPlayerAction);
    assert!(session.run_opponent_turn().await.is_none());
}

#[tokio::test]
async fn panicking_oracle_takes_the_failure_fallback() {
    let session = session_with(Arc::new(PanickingOracle), Arc::new(SilentCues), Duration::from_secs(1));

    let reports = session.play_turn(0).await;
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1].fallback, Some(Fallback::OracleFailed));
    assert_eq!(session.phase().await, Phase::AwaitingPlayerAction);
}
