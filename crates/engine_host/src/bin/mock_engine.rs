//! Minimal stand-in engine speaking the same line protocol as Pikafish.
//!
//! It does not search: `go` reports the first few pseudo-legal moves as
//! variations and plays the first one. Used by the integration tests and
//! handy for running the GUI without a real engine
//! (`XIANGQI_ENGINE=target/debug/mock_engine`).

use std::io::{self, BufRead, Write};

use xiangqi_core::{pseudo_moves, Board, MoveLedger, MoveText};

/// Apply the arguments of a `position` command.
///
/// Accepts `startpos [moves ...]` and `fen <fields...> [moves ...]`.
/// Returns `None` on a bad FEN or a move from an empty square.
fn set_position(args: &[&str]) -> Option<MoveLedger> {
    let moves_at = args.iter().position(|&t| t == "moves").unwrap_or(args.len());
    let initial = match args.first().copied() {
        Some("startpos") => Board::startpos(),
        Some("fen") => Board::from_fen(&args[1..moves_at].join(" ")).ok()?,
        _ => return None,
    };

    let mut ledger = MoveLedger::new(initial);
    for txt in args.iter().skip(moves_at + 1) {
        let mv = MoveText::parse(txt)?;
        ledger.apply_text(mv)?;
    }
    Some(ledger)
}

fn main() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut ledger = MoveLedger::default();
    let mut multipv: usize = 1;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "uci" => {
                writeln!(stdout, "id name MockXiangqi 0.1").ok();
                writeln!(stdout, "id author ML-chess").ok();
                writeln!(stdout, "option name MultiPV type spin default 1 min 1 max 8").ok();
                writeln!(stdout, "uciok").ok();
            }
            "isready" => {
                writeln!(stdout, "readyok").ok();
            }
            "setoption" => {
                // setoption name MultiPV value 3
                if parts.get(2) == Some(&"MultiPV") && parts.get(3) == Some(&"value") {
                    if let Some(n) = parts.get(4).and_then(|v| v.parse::<usize>().ok()) {
                        multipv = n.clamp(1, 8);
                    }
                }
            }
            "ucinewgame" => {
                ledger = MoveLedger::default();
            }
            "position" => match set_position(&parts[1..]) {
                Some(l) => ledger = l,
                None => {
                    writeln!(stdout, "info string invalid position: {}", line.trim()).ok();
                }
            },
            "go" => {
                let moves = pseudo_moves(ledger.board());
                for (i, mv) in moves.iter().take(multipv).enumerate() {
                    writeln!(
                        stdout,
                        "info depth 1 seldepth 1 multipv {} score cp {} nodes {} pv {}",
                        i + 1,
                        -10 * i as i32,
                        moves.len(),
                        mv
                    )
                    .ok();
                }
                match moves.first() {
                    Some(mv) => writeln!(stdout, "bestmove {}", mv).ok(),
                    None => writeln!(stdout, "bestmove (none)").ok(),
                };
            }
            "d" => {
                writeln!(stdout, "{}", ledger.board()).ok();
                writeln!(stdout, "Fen: {}", ledger.board().to_fen()).ok();
            }
            "stop" => {
                // Searches finish instantly, nothing to stop.
            }
            "quit" => break,
            _ => {
                writeln!(stdout, "Unknown command: '{}'. Type help for more information.", line.trim()).ok();
            }
        }
        stdout.flush().ok();
    }
}
