//! Integration tests for collaborators wired to a session

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use blockfall::bot;
use blockfall::core::{EventKind, GameEvent, ScoreKeeper, SequenceRng, Session, SessionConfig};
use blockfall::types::{GameAction, PieceKind};

#[test]
fn test_score_keeper_follows_clears() {
    // Vertical I pieces placed in every column clear four rows at once
    let mut session =
        Session::with_rng(SessionConfig::default(), SequenceRng::repeat(PieceKind::I)).unwrap();
    let (score, _) = ScoreKeeper::attach(session.events());

    for column in 0..10i8 {
        let target = column - 1;
        while session.active().x > target && session.move_left() {}
        while session.active().x < target && session.move_right() {}
        session.snap_down();
    }

    let score = score.borrow();
    assert_eq!(score.lines(), 4);
    assert_eq!(score.score(), 800);
    assert_eq!(session.board().filled(), 0);
}

#[test]
fn test_score_keeper_records_best_on_game_over() {
    let mut session =
        Session::with_rng(SessionConfig::default(), SequenceRng::repeat(PieceKind::O)).unwrap();
    let (score, _) = ScoreKeeper::attach_with(session.events(), ScoreKeeper::with_best(1200));

    // Stack O pieces in the middle until the top row fills
    for _ in 0..10 {
        session.snap_down();
    }
    let score = score.borrow();
    assert_eq!(score.best(), 1200);
    assert_eq!(score.score(), 0);
}

#[test]
fn test_filtered_subscribers_and_unsubscribe() {
    let mut session = Session::new(SessionConfig::default()).unwrap();
    let rotations = Rc::new(Cell::new(0));
    let r = Rc::clone(&rotations);
    let id = session
        .events()
        .subscribe(EventKind::Rotate, move |_| r.set(r.get() + 1));

    session.rotate();
    session.move_left();
    session.rotate();
    assert_eq!(rotations.get(), 2);

    assert!(session.events().unsubscribe(id));
    session.rotate();
    assert_eq!(rotations.get(), 2);
}

#[test]
fn test_actions_by_name() {
    let mut session = Session::new(SessionConfig::default()).unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    session
        .events()
        .subscribe_all(move |event| sink.borrow_mut().push(event.kind().as_str()));

    for name in ["moveLeft", "moveRight", "rotate", "moveDown", "snapDown"] {
        let action = GameAction::from_str(name).unwrap();
        session.apply_action(action);
    }
    let log = log.borrow();
    assert_eq!(&log[..3], &["moveLeft", "moveRight", "rotate"]);
    assert_eq!(log.last(), Some(&"snapDown"));
}

#[test]
fn test_toggle_pause_round_trip() {
    let mut session = Session::new(SessionConfig::default().with_start_paused(true)).unwrap();
    assert!(session.paused());
    assert!(!session.tick(1000.0));

    session.apply_action(GameAction::TogglePause);
    assert!(!session.paused());
    assert!(session.tick(1000.0));
}

#[test]
fn test_snapshot_reflects_session() {
    let mut session =
        Session::with_rng(SessionConfig::default(), SequenceRng::repeat(PieceKind::T)).unwrap();
    session.snap_down();

    let snap = session.snapshot();
    assert_eq!(snap.board[19][4], PieceKind::T.code());
    assert_eq!(snap.board[18][5], PieceKind::T.code());
    assert_eq!(snap.next, Some(PieceKind::T));
    assert_eq!(snap.piece_id, 2);
    assert_eq!(snap.ghost_y, Some(16));

    let active = snap.active.unwrap();
    assert_eq!((active.x, active.y), (4, 0));
    assert!(snap.render_text().lines().next().unwrap().contains('t'));
}

#[test]
fn test_bot_clears_rows() {
    let mut session = Session::new(SessionConfig::default().with_seed(11)).unwrap();
    let (score, _) = ScoreKeeper::attach(session.events());

    for _ in 0..150 {
        assert!(bot::play_piece(&mut session));
    }
    let score = score.borrow();
    assert!(score.lines() + score.best() > 0);
}

#[test]
fn test_level_up_handler_sees_its_own_event() {
    // Vertical I pieces in every column clear four rows
    let mut session =
        Session::with_rng(SessionConfig::default(), SequenceRng::repeat(PieceKind::I)).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let (s, channel) = (Rc::clone(&seen), session.events().clone());
    session.events().subscribe_all(move |event| {
        s.borrow_mut().push(event.kind().as_str());
        if let GameEvent::ClearRows(_) = event {
            channel.emit(&GameEvent::LevelChange(2));
        }
    });

    for column in 0..10i8 {
        let target = column - 1;
        while session.active().x > target && session.move_left() {}
        while session.active().x < target && session.move_right() {}
        session.snap_down();
    }

    let seen = seen.borrow();
    let clear = seen.iter().position(|name| *name == "clearRows").unwrap();
    assert_eq!(seen[clear + 1], "levelChange");
    assert_eq!(seen[clear + 2], "snapDown");
}
