use super::*;

fn sq(coord: &str) -> Square {
    Square::from_coord(coord).unwrap()
}

fn mv(text: &str) -> MoveText {
    MoveText::parse(text).unwrap()
}

fn options() -> PlayOptions {
    PlayOptions::from(&Settings::default())
}

fn search(moves: &[&str]) -> Vec<EngineCommand> {
    vec![
        EngineCommand::Stop,
        EngineCommand::Position {
            start: StartPosition::StartPos,
            moves: moves.iter().map(|m| m.to_string()).collect(),
        },
        EngineCommand::GoMoveTime(1000),
    ]
}

/// A game whose engine has completed the handshake.
fn ready_game(options: PlayOptions) -> GameState {
    let mut game = GameState::new(options);
    game.on_engine_line("id name Pikafish");
    game.on_engine_line("uciok");
    game
}

fn play(game: &mut GameState, from: &str, to: &str) -> Vec<EngineCommand> {
    game.select_square(sq(from));
    game.select_square(sq(to))
}

#[test]
fn test_handshake_configures_and_analyses() {
    let mut game = GameState::new(options());
    assert_eq!(game.engine_status, EngineStatus::Connecting);
    assert!(game.analyze().is_empty());

    let reaction = game.on_engine_line("uciok");
    assert!(game.engine_ready);
    assert_eq!(game.engine_status, EngineStatus::Ready);
    assert_eq!(
        reaction.commands,
        vec![EngineCommand::multipv(3), EngineCommand::IsReady]
    );

    let reaction = game.on_engine_line("readyok");
    assert_eq!(reaction.commands, search(&[]));
    assert!(!game.thinking);
}

#[test]
fn test_selection_shows_destinations() {
    let mut game = ready_game(options());

    assert!(game.select_square(sq("h2")).is_empty());
    assert_eq!(game.selected, Some(sq("h2")));
    assert!(game.targets.contains(&sq("e2")));
    assert!(game.targets.contains(&sq("h9")));

    // Enemy piece out of reach clears the selection
    game.select_square(sq("a9"));
    assert_eq!(game.selected, None);
    assert!(game.targets.is_empty());

    // Empty non-target square clears it too
    game.select_square(sq("b2"));
    game.select_square(sq("e5"));
    assert_eq!(game.selected, None);
}

#[test]
fn test_player_move_requests_engine_reply() {
    let mut game = ready_game(options());

    let commands = play(&mut game, "h2", "e2");
    assert_eq!(game.ledger.moves_text(), vec!["h2e2"]);
    assert_eq!(game.side_to_move(), Side::Black);
    assert_eq!(commands, search(&["h2e2"]));
    assert!(game.thinking);
    assert_eq!(game.activity, "Engine thinking...");
}

#[test]
fn test_board_is_locked_while_thinking() {
    let mut game = ready_game(options());
    play(&mut game, "h2", "e2");

    assert!(game.select_square(sq("h9")).is_empty());
    assert_eq!(game.selected, None);
    assert_eq!(game.ledger.len(), 1);
}

#[test]
fn test_bestmove_on_engine_turn_is_replied() {
    let mut game = ready_game(options());
    play(&mut game, "h2", "e2");

    let reaction = game.on_engine_line("bestmove h9g7 ponder b0c2");
    assert!(!game.thinking);
    assert!(game.activity.is_empty());
    assert_eq!(reaction.reply, Some(mv("h9g7")));
    assert!(reaction.commands.is_empty());

    let commands = game.apply_engine_move(mv("h9g7"));
    assert_eq!(game.ledger.moves_text(), vec!["h2e2", "h9g7"]);
    assert_eq!(commands, search(&["h2e2", "h9g7"]));
    assert!(!game.thinking);
}

#[test]
fn test_bestmove_off_turn_is_only_analysis() {
    let mut game = ready_game(options());
    game.on_engine_line("readyok");

    let reaction = game.on_engine_line("bestmove h2e2");
    assert_eq!(reaction, EngineReaction::default());
    assert!(game.ledger.is_empty());
}

#[test]
fn test_bestmove_none_plays_nothing() {
    let mut game = ready_game(options());
    play(&mut game, "h2", "e2");
    let reaction = game.on_engine_line("bestmove (none)");
    assert_eq!(reaction.reply, None);
    assert!(!game.thinking);
}

#[test]
fn test_engine_move_from_empty_square_is_ignored() {
    let mut game = ready_game(options());
    play(&mut game, "h2", "e2");

    assert!(game.apply_engine_move(mv("e5e4")).is_empty());
    assert_eq!(game.ledger.len(), 1);
}

#[test]
fn test_stale_bestmove_is_still_applied() {
    let mut opts = options();
    opts.play_vs_engine = false;
    let mut game = ready_game(opts);
    play(&mut game, "h2", "e2");

    // Analysis search is superseded by a reply request
    assert_eq!(game.set_play_vs_engine(true), search(&["h2e2"]));

    // The stopped analysis answers first and is played anyway
    let reaction = game.on_engine_line("bestmove h9g7");
    assert_eq!(reaction.reply, Some(mv("h9g7")));
    game.apply_engine_move(mv("h9g7"));

    // The real reply then arrives off turn and is dropped
    let reaction = game.on_engine_line("bestmove b9c7");
    assert_eq!(reaction.reply, None);
    assert_eq!(game.ledger.moves_text(), vec!["h2e2", "h9g7"]);
}

#[test]
fn test_info_lines_fill_analysis_from_red_side() {
    let mut game = ready_game(options());
    play(&mut game, "h2", "e2");

    game.on_engine_line("info depth 12 seldepth 16 multipv 1 score cp 40 nodes 100 pv h9g7 h0g2");
    game.on_engine_line("info depth 12 multipv 2 score cp 55 pv b9c7");
    game.on_engine_line("info string NNUE evaluation enabled");

    assert_eq!(game.analysis.depth(), Some("12"));
    assert_eq!(game.analysis.line(1).unwrap().score_text(), "-0.40");
    assert_eq!(game.analysis.line(2).unwrap().score_text(), "-0.55");
    assert_eq!(game.log.len(), 5);
}

#[test]
fn test_hover_highlights_first_move() {
    let mut game = ready_game(options());
    game.on_engine_line("info depth 5 multipv 2 score cp 3 pv b2e2 h9g7");

    game.hover_line(Some(2));
    assert_eq!(game.hovered, Some(mv("b2e2")));
    game.hover_line(Some(1));
    assert_eq!(game.hovered, None);
    game.hover_line(Some(2));
    game.hover_line(None);
    assert_eq!(game.hovered, None);
}

#[test]
fn test_undo_reanalyses() {
    let mut game = ready_game(options());
    assert!(game.undo().is_empty());

    play(&mut game, "h2", "e2");
    game.on_engine_line("bestmove h9g7");
    game.apply_engine_move(mv("h9g7"));

    assert_eq!(game.undo(), search(&["h2e2"]));
    assert_eq!(game.side_to_move(), Side::Black);
    assert!(!game.thinking);
}

#[test]
fn test_new_game_clears_state() {
    let mut game = ready_game(options());
    game.on_engine_line("info depth 5 score cp 3 pv h2e2");
    play(&mut game, "h2", "e2");
    game.on_engine_line("bestmove h9g7");
    game.apply_engine_move(mv("h9g7"));
    game.select_square(sq("b2"));

    let commands = game.new_game();
    assert!(game.ledger.is_empty());
    assert_eq!(game.board(), &Board::startpos());
    assert_eq!(game.selected, None);
    assert_eq!(game.analysis, Analysis::new());
    assert_eq!(commands, search(&[]));
}

#[test]
fn test_new_game_with_engine_as_red_starts_engine() {
    let mut opts = options();
    opts.engine_side = Side::Red;
    let mut game = ready_game(opts);

    let commands = game.new_game();
    assert!(game.thinking);
    assert_eq!(commands, search(&[]));

    let reaction = game.on_engine_line("bestmove h2e2");
    assert_eq!(reaction.reply, Some(mv("h2e2")));
}

#[test]
fn test_jump_to_replays_once() {
    let mut opts = options();
    opts.play_vs_engine = false;
    let mut game = ready_game(opts);
    play(&mut game, "h2", "e2");
    play(&mut game, "h9", "g7");
    play(&mut game, "h0", "g2");

    let commands = game.jump_to(2);
    assert_eq!(game.ledger.moves_text(), vec!["h2e2", "h9g7"]);
    assert_eq!(commands, search(&["h2e2", "h9g7"]));

    assert_eq!(game.jump_to(0), search(&[]));
    assert_eq!(game.board(), &Board::startpos());
}

#[test]
fn test_jump_to_engine_turn_requests_reply() {
    let mut game = ready_game(options());
    play(&mut game, "h2", "e2");
    game.on_engine_line("bestmove h9g7");
    game.apply_engine_move(mv("h9g7"));

    let commands = game.jump_to(1);
    assert!(game.thinking);
    assert_eq!(commands, search(&["h2e2"]));
}

#[test]
fn test_load_fen_uses_fen_position() {
    let mut opts = options();
    opts.play_vs_engine = false;
    let mut game = ready_game(opts);

    let commands = game.load_fen("4k4/9/9/9/9/9/9/9/4R4/4K4 w").unwrap();
    assert_eq!(
        commands[1],
        EngineCommand::Position {
            start: StartPosition::Fen("4k4/9/9/9/9/9/9/9/4R4/4K4 w - - 0 1".to_string()),
            moves: Vec::new(),
        }
    );

    let commands = play(&mut game, "e1", "e8");
    assert_eq!(
        commands[1].to_string(),
        "position fen 4k4/9/9/9/9/9/9/9/4R4/4K4 w - - 0 1 moves e1e8"
    );
}

#[test]
fn test_bad_fen_leaves_game_alone() {
    let mut game = ready_game(options());
    play(&mut game, "h2", "e2");

    assert!(game.load_fen("rnbakabnr/9/9 w").is_err());
    assert_eq!(game.ledger.moves_text(), vec!["h2e2"]);
}

#[test]
fn test_toggles() {
    let mut opts = options();
    opts.play_vs_engine = false;
    opts.auto_analyze = false;
    let mut game = ready_game(opts);
    assert!(game.on_engine_line("readyok").commands.is_empty());

    assert!(play(&mut game, "h2", "e2").is_empty());
    assert_eq!(game.set_auto_analyze(true), search(&["h2e2"]));
    assert!(game.set_auto_analyze(false).is_empty());

    assert_eq!(game.set_play_vs_engine(true), search(&["h2e2"]));
    assert!(game.thinking);
}

#[test]
fn test_think_time_input() {
    let mut game = ready_game(options());
    game.set_think_time("2500");
    assert_eq!(game.options.think_time_ms, 2500);
    game.set_think_time("fast");
    game.set_think_time("");
    assert_eq!(game.options.think_time_ms, 2500);
}

#[test]
fn test_hint_locks_until_bestmove() {
    let mut opts = options();
    opts.play_vs_engine = false;
    let mut game = ready_game(opts);

    assert_eq!(game.hint(), search(&[]));
    assert!(game.thinking);
    assert_eq!(game.activity, "Calculating hint...");

    let reaction = game.on_engine_line("bestmove h2e2");
    assert_eq!(reaction.reply, None);
    assert!(!game.thinking);
}

#[test]
fn test_exited_engine_gets_nothing() {
    let mut game = ready_game(options());
    play(&mut game, "h2", "e2");
    game.engine_exited(Some(1));

    assert!(!game.engine_ready);
    assert!(!game.thinking);
    assert_eq!(game.engine_status.to_string(), "Engine exited with code 1");
    assert!(game.analyze().is_empty());
    assert!(game.hint().is_empty());
    assert!(!game.thinking);
}

#[test]
fn test_failed_engine_status() {
    let mut game = GameState::new(options());
    game.engine_failed("failed to start engine engine/pikafish: not found".to_string());
    assert_eq!(
        game.engine_status.to_string(),
        "Error: failed to start engine engine/pikafish: not found"
    );
}

#[test]
fn test_log_is_bounded() {
    let mut log = EngineLog::default();
    for i in 0..LOG_CAPACITY + 20 {
        log.push(format!("line {i}"));
    }
    assert_eq!(log.len(), LOG_CAPACITY);
    assert_eq!(log.lines().next(), Some("line 20"));
    assert_eq!(log.lines().last(), Some(format!("line {}", LOG_CAPACITY + 19).as_str()));
}

#[test]
fn test_engine_pieces_locked_on_engine_turn() {
    let mut game = GameState::new(options());
    play(&mut game, "h2", "e2");
    // No engine yet, so nothing is thinking, but Black belongs to the engine
    assert!(!game.thinking);

    assert!(play(&mut game, "h9", "g7").is_empty());
    assert_eq!(game.selected, None);
    assert_eq!(game.ledger.moves_text(), vec!["h2e2"]);

    // Once the handshake completes the owed reply is requested
    game.on_engine_line("uciok");
    let reaction = game.on_engine_line("readyok");
    assert_eq!(reaction.commands, search(&["h2e2"]));
    assert!(game.thinking);
}

#[test]
fn test_engine_turn_unlocked_when_play_vs_engine_off() {
    let mut game = GameState::new(options());
    play(&mut game, "h2", "e2");
    game.set_play_vs_engine(false);

    play(&mut game, "h9", "g7");
    assert_eq!(game.ledger.moves_text(), vec!["h2e2", "h9g7"]);
}
