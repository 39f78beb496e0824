mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{assert_solved, placements_of, shared_session, turned, ScriptedEngine};
use twisty_core::{Applied, ClientConfig, CubeError, MoveToken, Notice};
use twisty_sync::{MoveSubmitter, StepOutcome, SyncClient, SyncLoop};

const POLL: Duration = Duration::from_millis(500);

fn token(s: &str) -> MoveToken {
    s.parse().unwrap()
}

#[tokio::test]
async fn accepted_move_applies_immediately() {
    let engine = Arc::new(ScriptedEngine::solved());
    let session = shared_session();
    let sync = SyncLoop::new(Arc::clone(&engine), Arc::clone(&session), POLL);
    let submitter = MoveSubmitter::new(Arc::clone(&engine), Arc::clone(&session), sync.refresher());

    assert_eq!(submitter.submit(token("R")).await, Ok(Applied::Fresh(27)));

    // no poll has run; the placements come from the move response itself
    assert_eq!(engine.fetches(), 0);
    assert_eq!(session.lock().placements(), placements_of(&turned("R")));
    assert!(session.lock().take_notices().is_empty());
}

#[tokio::test]
async fn rejected_move_raises_one_notice_and_changes_nothing() {
    let engine = Arc::new(ScriptedEngine::solved());
    engine.reject_moves("invalid");
    let session = shared_session();
    let sync = SyncLoop::new(Arc::clone(&engine), Arc::clone(&session), POLL);
    let submitter = MoveSubmitter::new(Arc::clone(&engine), Arc::clone(&session), sync.refresher());
    let before = session.lock().placements();

    assert_eq!(
        submitter.submit(token("U")).await,
        Err(CubeError::InvalidMoveRejected {
            token: "U".into(),
            status: "invalid".into()
        })
    );
    assert_eq!(session.lock().placements(), before);
    assert_eq!(
        session.lock().take_notices(),
        vec![Notice::InvalidMove {
            token: "U".into(),
            status: "invalid".into()
        }]
    );
    assert!(session.lock().take_notices().is_empty());
}

#[tokio::test]
async fn unknown_base_letter_never_reaches_engine() {
    let engine = Arc::new(ScriptedEngine::solved());
    let session = shared_session();
    let sync = SyncLoop::new(Arc::clone(&engine), Arc::clone(&session), POLL);
    let submitter = MoveSubmitter::new(Arc::clone(&engine), Arc::clone(&session), sync.refresher());

    let result = submitter.submit_notation("Q").await;
    assert!(matches!(
        result,
        Err(CubeError::InvalidMoveRejected { ref token, .. }) if token == "Q"
    ));
    assert_eq!(engine.submits(), 0);
    assert_solved(&session);
    assert_eq!(session.lock().take_notices().len(), 1);
    assert!(session.lock().take_notices().is_empty());
}

#[tokio::test]
async fn notation_path_submits_valid_tokens() {
    let engine = Arc::new(ScriptedEngine::solved());
    let session = shared_session();
    let sync = SyncLoop::new(Arc::clone(&engine), Arc::clone(&session), POLL);
    let submitter = MoveSubmitter::new(Arc::clone(&engine), Arc::clone(&session), sync.refresher());

    submitter.submit_notation("F2").await.unwrap();
    assert_eq!(engine.submits(), 1);
    assert_eq!(session.lock().placements(), placements_of(&turned("F2")));
}

#[tokio::test]
async fn poll_issued_before_move_does_not_roll_it_back() {
    let engine = Arc::new(ScriptedEngine::solved());
    let release = engine.gate();
    let session = shared_session();
    let sync = Arc::new(SyncLoop::new(Arc::clone(&engine), Arc::clone(&session), POLL));
    let submitter = MoveSubmitter::new(Arc::clone(&engine), Arc::clone(&session), sync.refresher());

    let poll = tokio::spawn({
        let sync = Arc::clone(&sync);
        async move { sync.step().await }
    });
    while engine.fetches() == 0 {
        tokio::task::yield_now().await;
    }

    // the move is issued after the poll but answers first
    submitter.submit(token("R")).await.unwrap();
    release.send(turned("")).unwrap();
    assert_eq!(poll.await.unwrap(), Ok(StepOutcome::Stale));

    assert_eq!(session.lock().placements(), placements_of(&turned("R")));
}

#[tokio::test]
async fn poll_answered_while_move_in_flight_does_not_hide_it() {
    let engine = Arc::new(ScriptedEngine::solved());
    let release = engine.gate_moves();
    let session = shared_session();
    let sync = SyncLoop::new(Arc::clone(&engine), Arc::clone(&session), POLL);
    let submitter = MoveSubmitter::new(Arc::clone(&engine), Arc::clone(&session), sync.refresher());

    let pending = tokio::spawn({
        let submitter = submitter.clone();
        async move { submitter.submit(token("R")).await }
    });
    while engine.submits() == 0 {
        tokio::task::yield_now().await;
    }

    // the engine answers this poll before it performs the turn
    assert_eq!(sync.step().await, Ok(StepOutcome::Applied(27)));
    assert_solved(&session);

    release.send(()).unwrap();
    assert_eq!(pending.await.unwrap(), Ok(Applied::Fresh(27)));
    assert_eq!(session.lock().placements(), placements_of(&turned("R")));
}

#[tokio::test(start_paused = true)]
async fn accepted_move_with_unusable_state_still_refreshes() {
    let engine = Arc::new(ScriptedEngine::solved());
    engine.truncate_moves();
    let client = SyncClient::start(&ClientConfig::default(), Arc::clone(&engine)).unwrap();
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(engine.fetches(), 1);

    assert_eq!(
        client.submitter.submit(token("R")).await,
        Err(CubeError::StateLengthMismatch {
            expected: 27,
            actual: 26
        })
    );
    assert_solved(&client.session);

    // the refresh brings in the engine's state without waiting for the tick
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(engine.fetches(), 2);
    assert_eq!(client.session.lock().placements(), placements_of(&turned("R")));

    client.handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn accepted_move_triggers_refresh_before_next_tick() {
    let engine = Arc::new(ScriptedEngine::solved());
    let client = SyncClient::start(&ClientConfig::default(), Arc::clone(&engine)).unwrap();
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(engine.fetches(), 1);

    client.submitter.submit(token("R")).await.unwrap();
    assert_eq!(client.session.lock().placements(), placements_of(&turned("R")));

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(engine.fetches(), 2);
    assert_eq!(client.session.lock().placements(), placements_of(&turned("R")));

    client.handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn rejection_refetches_only_when_enabled() {
    for (enabled, expected_fetches) in [(false, 1), (true, 2)] {
        let engine = Arc::new(ScriptedEngine::solved());
        engine.reject_moves("invalid");
        let config = ClientConfig {
            refetch_on_reject: enabled,
            ..ClientConfig::default()
        };
        let client = SyncClient::start(&config, Arc::clone(&engine)).unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert!(client.submitter.submit(token("B")).await.is_err());
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(engine.fetches(), expected_fetches, "refetch_on_reject = {enabled}");

        client.handle.shutdown().await;
    }
}
