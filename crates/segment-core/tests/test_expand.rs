use segment_core::detection::{expand_box, expand_boxes};
use segment_core::frame::BoundingBox;

#[test]
fn test_expand_clamps_top_left_to_one() {
    let b = BoundingBox::new(2, 2, 8, 8);
    let e = expand_box(&b, 1.0, (10, 10));
    assert_eq!(e.top, 1);
    assert_eq!(e.left, 1);
}

#[test]
fn test_expand_overrun_recomputed_from_top() {
    // bottom = 8 + 6 = 14 > 10, recomputed as 10 - 1 - 1.
    let b = BoundingBox::new(2, 2, 8, 8);
    assert_eq!(expand_box(&b, 1.0, (10, 10)), BoundingBox::new(1, 1, 8, 8));
}

#[test]
fn test_expand_wide_box_right_edge() {
    let b = BoundingBox::new(10, 10, 20, 95);
    let e = expand_box(&b, 0.2, (100, 100));
    // Width 85 pads by 17 on each side; both horizontal edges overrun.
    assert_eq!(e, BoundingBox::new(8, 1, 22, 98));
}

#[test]
fn test_expand_overrun_never_inverts() {
    // Near the right border the recomputed right edge would fall left of
    // the left edge.
    let b = BoundingBox::new(10, 80, 20, 98);
    let e = expand_box(&b, 0.2, (100, 100));
    assert_eq!(e.left, 76);
    assert_eq!(e.right, 76);
    assert_eq!(e.width(), 0);
}

#[test]
fn test_expand_bottom_overrun_never_inverts() {
    // Near the bottom border the recomputed bottom edge would fall above
    // the top edge.
    let b = BoundingBox::new(80, 10, 98, 20);
    let e = expand_box(&b, 0.2, (100, 100));
    assert_eq!(e, BoundingBox::new(76, 8, 76, 22));
    assert_eq!(e.height(), 0);
    assert_eq!(e.width(), 14);
}

#[test]
fn test_expand_rounds_half_away_from_zero() {
    // 5 * 0.1 = 0.5 pads by one pixel.
    let b = BoundingBox::new(10, 10, 15, 15);
    assert_eq!(expand_box(&b, 0.1, (100, 100)), BoundingBox::new(9, 9, 16, 16));
}

#[test]
fn test_expand_anisotropic_padding() {
    let b = BoundingBox::new(40, 30, 50, 70);
    // Height 10 pads 2 rows, width 40 pads 8 columns.
    assert_eq!(expand_box(&b, 0.2, (100, 100)), BoundingBox::new(38, 22, 52, 78));
}

#[test]
fn test_expand_boxes_preserves_order_and_length() {
    let boxes = vec![
        BoundingBox::new(60, 60, 70, 70),
        BoundingBox::new(10, 10, 20, 20),
        BoundingBox::new(30, 40, 35, 45),
    ];
    let expanded = expand_boxes(&boxes, 0.2, (100, 100));
    assert_eq!(expanded.len(), 3);
    assert_eq!(expanded[0], BoundingBox::new(58, 58, 72, 72));
    assert_eq!(expanded[1], BoundingBox::new(8, 8, 22, 22));
    assert_eq!(expanded[2], BoundingBox::new(29, 39, 36, 46));
}

#[test]
fn test_expand_empty_list() {
    assert!(expand_boxes(&[], 0.2, (10, 10)).is_empty());
}
