use super::*;

#[test]
fn test_coord_corners() {
    // Top-left intersection is Black's back rank, file a
    assert_eq!(Square::new(0, 0).unwrap().to_coord(), "a9");
    assert_eq!(Square::new(9, 0).unwrap().to_coord(), "a0");
    assert_eq!(Square::new(9, 8).unwrap().to_coord(), "i0");
    assert_eq!(Square::new(7, 7).unwrap().to_coord(), "h2");
}

#[test]
fn test_coord_roundtrip_every_square() {
    for sq in Square::all() {
        assert_eq!(Square::from_coord(&sq.to_coord()), Some(sq));
    }
    assert_eq!(Square::all().count(), 90);
}

#[test]
fn test_coord_rejects_out_of_range() {
    assert_eq!(Square::from_coord("j0"), None);
    assert_eq!(Square::from_coord("a"), None);
    assert_eq!(Square::from_coord("a10"), None);
    assert_eq!(Square::from_coord("A0"), None);
    assert_eq!(Square::from_coord("e-"), None);
}

#[test]
fn test_move_text() {
    let mv = MoveText::parse("h2e2").unwrap();
    assert_eq!(mv.from, Square::new(7, 7).unwrap());
    assert_eq!(mv.to, Square::new(7, 4).unwrap());
    assert_eq!(mv.to_string(), "h2e2");

    assert_eq!(MoveText::parse("h2e"), None);
    assert_eq!(MoveText::parse("z2e2"), None);
    assert_eq!(MoveText::parse("(none)"), None);
}

#[test]
fn test_offset_stays_on_board() {
    let corner = Square::new(0, 0).unwrap();
    assert_eq!(corner.offset(-1, 0), None);
    assert_eq!(corner.offset(0, -1), None);
    assert_eq!(corner.offset(9, 8), Square::new(9, 8));
    assert_eq!(corner.offset(10, 0), None);
}

#[test]
fn test_piece_letters() {
    for kind in PieceKind::ALL {
        let red = Piece::new(Side::Red, kind);
        let black = Piece::new(Side::Black, kind);
        assert_eq!(Piece::from_fen_char(red.fen_char()), Some(red));
        assert_eq!(Piece::from_fen_char(black.fen_char()), Some(black));
    }
    assert_eq!(Piece::from_fen_char('q'), None);
}

#[test]
fn test_river_halves() {
    assert!(Side::Red.owns_row(5));
    assert!(!Side::Red.owns_row(4));
    assert!(Side::Black.owns_row(4));
    assert!(!Side::Black.owns_row(5));
}
