//! End-to-end sessions against the bundled mock engine binary.

use std::time::Duration;

use engine_host::{EngineConfig, EngineEvent, EngineHandle};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;
use xiangqi_core::{
    pseudo_moves, EngineCommand, EngineMessage, MoveLedger, MoveText, StartPosition,
};

const WAIT: Duration = Duration::from_secs(10);

fn mock_config() -> EngineConfig {
    EngineConfig::new(env!("CARGO_BIN_EXE_mock_engine"))
}

async fn next_event(events: &mut UnboundedReceiver<EngineEvent>) -> EngineEvent {
    timeout(WAIT, events.recv())
        .await
        .expect("engine went quiet")
        .expect("event channel closed")
}

/// Collect output lines until one parses as `done`, returning all of them.
async fn read_until(
    events: &mut UnboundedReceiver<EngineEvent>,
    done: impl Fn(&EngineMessage) -> bool,
) -> Vec<String> {
    let mut lines = Vec::new();
    loop {
        match next_event(events).await {
            EngineEvent::Output(line) => {
                let finished = done(&EngineMessage::parse(&line));
                lines.push(line);
                if finished {
                    return lines;
                }
            }
            EngineEvent::Exited { code } => panic!("engine exited early with {code:?}"),
        }
    }
}

async fn start() -> (EngineHandle, UnboundedReceiver<EngineEvent>) {
    let (handle, mut events) = EngineHandle::spawn(&mock_config()).expect("mock engine spawns");
    // `uci` is sent on spawn
    let lines = read_until(&mut events, |m| *m == EngineMessage::EngineReady).await;
    assert!(lines[0].starts_with("id name"));
    (handle, events)
}

#[tokio::test]
async fn test_handshake_and_sync() {
    let (handle, mut events) = start().await;
    assert!(handle.is_alive());

    assert!(handle.send(&EngineCommand::IsReady));
    let lines = read_until(&mut events, |m| *m == EngineMessage::SyncAck).await;
    assert_eq!(lines, vec!["readyok"]);

    handle.shutdown();
}

#[tokio::test]
async fn test_search_reports_variations_then_bestmove() {
    let (handle, mut events) = start().await;

    handle.send(&EngineCommand::multipv(3));
    handle.send(&EngineCommand::Position {
        start: StartPosition::StartPos,
        moves: vec!["h2e2".to_string()],
    });
    handle.send(&EngineCommand::GoMoveTime(50));

    let lines = read_until(&mut events, |m| matches!(m, EngineMessage::BestMove { .. })).await;
    let infos: Vec<_> = lines
        .iter()
        .filter_map(|l| match EngineMessage::parse(l) {
            EngineMessage::SearchInfo(info) => Some(info),
            _ => None,
        })
        .collect();
    assert_eq!(infos.iter().map(|i| i.rank).collect::<Vec<_>>(), vec![1, 2, 3]);

    let mut ledger = MoveLedger::default();
    ledger.apply_text(MoveText::parse("h2e2").unwrap()).unwrap();
    let expected = pseudo_moves(ledger.board())[0].to_string();

    match EngineMessage::parse(lines.last().unwrap()) {
        EngineMessage::BestMove { mv, .. } => assert_eq!(mv, expected),
        other => panic!("expected bestmove, got {other:?}"),
    }
    assert_eq!(infos[0].pv, vec![expected]);

    handle.shutdown();
}

#[tokio::test]
async fn test_fen_position_is_honoured() {
    let (handle, mut events) = start().await;

    // Lone black king to move, boxed in by red rooks on d8 and f8.
    let fen = "4k4/3R1R3/9/9/9/9/9/9/9/4K4 b";
    handle.send(&EngineCommand::Position {
        start: StartPosition::Fen(fen.to_string()),
        moves: Vec::new(),
    });
    handle.send(&EngineCommand::GoMoveTime(10));

    let lines = read_until(&mut events, |m| matches!(m, EngineMessage::BestMove { .. })).await;
    match EngineMessage::parse(lines.last().unwrap()) {
        EngineMessage::BestMove { mv, .. } => {
            assert!(["d9", "f9", "e8"].iter().any(|to| mv == format!("e9{to}")), "{mv}")
        }
        other => panic!("expected bestmove, got {other:?}"),
    }

    handle.shutdown();
}

#[tokio::test]
async fn test_quit_reports_exit_after_output() {
    let (handle, mut events) = start().await;

    handle.send(&EngineCommand::IsReady);
    handle.send(&EngineCommand::Quit);

    assert_eq!(
        next_event(&mut events).await,
        EngineEvent::Output("readyok".to_string())
    );
    assert_eq!(next_event(&mut events).await, EngineEvent::Exited { code: Some(0) });
    assert!(!handle.is_alive());
    assert!(!handle.send(&EngineCommand::IsReady));
}

#[tokio::test]
async fn test_shutdown_stops_the_process() {
    let (handle, mut events) = start().await;
    handle.shutdown();

    loop {
        if let EngineEvent::Exited { .. } = next_event(&mut events).await {
            break;
        }
    }
    assert!(!handle.is_alive());
}

#[cfg(unix)]
#[tokio::test]
async fn test_output_after_invalid_utf8_is_delivered() {
    let config = EngineConfig::new("/bin/sh").with_args(vec![
        "-c".to_string(),
        r"printf 'info string caf\351\nuciok\n'".to_string(),
    ]);
    let (_handle, mut events) = EngineHandle::spawn(&config).expect("shell spawns");

    assert_eq!(
        next_event(&mut events).await,
        EngineEvent::Output("info string caf\u{fffd}".to_string())
    );
    assert_eq!(next_event(&mut events).await, EngineEvent::Output("uciok".to_string()));
    assert_eq!(next_event(&mut events).await, EngineEvent::Exited { code: Some(0) });
}
