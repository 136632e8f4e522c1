use tau::geometry::PixelBox;
use tau::layout::Fixed;
use tau::ui::collect_boxes;
use tau::{Block, Element, Flex, Leaf, Length, Quantity2D, Style, percent, px, view};

fn stacked(height: u32) -> Element {
    Leaf::background().sized(Fixed::new(20, height)).into()
}

#[test]
fn quantities_resolve_against_their_reference() {
    assert_eq!(percent(50.0).resolve(800.0), 400.0);
    assert_eq!(px(16.0).resolve(800.0), 16.0);
    assert_eq!(px(16.0).resolve(1.0), 16.0);
    assert_eq!(100.percent().resolve(800.0), 800.0);
}

#[test]
fn full_width_block_with_fixed_height() {
    let mut root = view(
        Block::new().dimensions(Quantity2D::both(100.percent(), 50.px())),
        Style::Default,
    )
    .build();
    let placed = root.layout(PixelBox::new(0, 0, 800, 600));
    assert_eq!(placed.width, 800);
    assert_eq!(placed.height, 50);
}

#[test]
fn unset_height_is_the_sum_of_children() {
    let mut root = view(Block::new(), Style::Default)
        .children(stacked(50) | stacked(100))
        .build();
    let placed = root.layout(PixelBox::new(0, 0, 800, 600));

    assert_eq!(placed.height, 150);
    let children = root.children();
    assert_eq!(children[0].bounds().top, 0);
    assert_eq!(children[1].bounds().top, 50);
}

#[test]
fn block_children_can_be_blocks() {
    let child = |h: u32| {
        view(
            Block::new().dimensions(Quantity2D::unset().y(px(h as f32))),
            Style::Default,
        )
    };
    let mut root = view(Block::new(), Style::Default)
        .children(child(50) | child(100))
        .build();
    let placed = root.layout(PixelBox::from_size(800, 600));

    assert_eq!(placed, PixelBox::new(0, 0, 800, 150));
    assert_eq!(root.children()[1].bounds(), PixelBox::new(0, 50, 800, 100));
}

#[test]
fn relayout_is_a_full_retraversal() {
    let mut root = view(Block::new(), Style::Default)
        .children(
            view(
                Block::new().dimensions(Quantity2D::both(50.percent(), 10.percent())),
                Style::Default,
            ) | stacked(5),
        )
        .build();

    root.layout(PixelBox::from_size(800, 600));
    let before = collect_boxes(&root);
    root.layout(PixelBox::from_size(400, 300));
    let after = collect_boxes(&root);

    assert_eq!(before.len(), after.len());
    assert_eq!(before[1].bounds, PixelBox::new(0, 0, 400, 80));
    assert_eq!(after[1].bounds, PixelBox::new(0, 0, 200, 40));
    assert_eq!(after[2].bounds.top, 40);
    assert_eq!(after[0].bounds.height, 45);
}

#[test]
fn flex_row_inside_block() {
    let mut root = view(Block::new(), Style::Default)
        .child(
            view(Flex::new(), Style::Default).children(
                Element::from(Leaf::span().sized(Fixed::new(30, 10)))
                    | Leaf::span().sized(Fixed::new(40, 25)),
            ),
        )
        .child(stacked(5))
        .build();
    root.layout(PixelBox::from_size(800, 600));

    let boxes = collect_boxes(&root);
    let depths: Vec<usize> = boxes.iter().map(|b| b.depth).collect();
    assert_eq!(depths, [0, 1, 2, 2, 1]);
    assert_eq!(boxes[1].bounds, PixelBox::new(0, 0, 70, 25));
    assert_eq!(boxes[3].bounds, PixelBox::new(30, 0, 40, 25));
    assert_eq!(boxes[4].bounds.top, 25);
    assert_eq!(boxes[0].bounds.height, 30);
}
