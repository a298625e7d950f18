//! Tetromino tests - catalog shapes and matrix transforms

use blockfall::core::rng::SimpleRng;
use blockfall::core::tetromino::{canonical_shape, random_tetromino, rotate, unrotate, Shape};
use blockfall::types::PieceKind;

#[test]
fn test_all_kinds_have_four_cells() {
    for kind in PieceKind::ALL {
        assert_eq!(canonical_shape(kind).count(), 4, "{:?}", kind);
    }
}

#[test]
fn test_canonical_matrices() {
    let check = |kind, rows: &[&[u8]]| {
        assert_eq!(canonical_shape(kind), Shape::from_rows(rows).unwrap(), "{:?}", kind);
    };
    check(PieceKind::J, &[&[0, 1, 0], &[0, 1, 0], &[1, 1, 0]]);
    check(PieceKind::L, &[&[0, 1, 0], &[0, 1, 0], &[0, 1, 1]]);
    check(PieceKind::O, &[&[1, 1], &[1, 1]]);
    check(PieceKind::S, &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]]);
    check(PieceKind::T, &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]]);
    check(PieceKind::Z, &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]]);
    check(
        PieceKind::I,
        &[&[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0]],
    );
}

#[test]
fn test_rotate_unrotate_inverse_for_every_orientation() {
    for kind in PieceKind::ALL {
        let mut shape = canonical_shape(kind);
        for _ in 0..4 {
            assert_eq!(rotate(&unrotate(&shape)), shape);
            assert_eq!(unrotate(&rotate(&shape)), shape);
            shape = rotate(&shape);
        }
    }
}

#[test]
fn test_rotate_non_square_inverse() {
    let bar = Shape::from_rows(&[&[1, 1, 1], &[0, 0, 1]]).unwrap();
    let turned = rotate(&bar);
    assert_eq!((turned.rows(), turned.cols()), (3, 2));
    assert_eq!(unrotate(&turned), bar);
}

#[test]
fn test_random_pieces_are_canonical_and_deterministic() {
    let mut a = SimpleRng::new(99);
    let mut b = SimpleRng::new(99);
    for _ in 0..50 {
        let (kind, shape) = random_tetromino(&mut a);
        assert_eq!(shape, canonical_shape(kind));
        assert_eq!(random_tetromino(&mut b).0, kind);
    }
}

#[test]
fn test_rotation_does_not_alias_catalog() {
    let first = rotate(&canonical_shape(PieceKind::L));
    assert_ne!(first, canonical_shape(PieceKind::L));
    // The catalog copy is untouched
    assert_eq!(
        canonical_shape(PieceKind::L),
        Shape::from_rows(&[&[0, 1, 0], &[0, 1, 0], &[0, 1, 1]]).unwrap()
    );
}
