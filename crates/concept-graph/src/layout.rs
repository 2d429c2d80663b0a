use crate::model::Position;

/// Offsets for nodes added one at a time from text selections.
pub const CASCADE_ORIGIN: Position = Position::new(120.0, 100.0);
pub const CASCADE_STEP: Position = Position::new(40.0, 24.0);

/// Cell geometry for wholesale imports.
pub const GRID_ORIGIN: Position = Position::new(80.0, 80.0);
pub const GRID_CELL: Position = Position::new(120.0, 70.0);

/// Diagonal staircase position for the node inserted at `index`.
pub fn cascade_position(index: usize) -> Position {
    let i = index as f32;
    Position::new(
        CASCADE_ORIGIN.x + CASCADE_STEP.x * i,
        CASCADE_ORIGIN.y + CASCADE_STEP.y * i,
    )
}

/// Number of columns for a near-square grid of `count` cells.
pub fn grid_columns(count: usize) -> usize {
    let mut columns = (count as f64).sqrt().ceil() as usize;
    // Guard against float rounding on perfect squares.
    while columns * columns < count {
        columns += 1;
    }
    columns.max(1)
}

/// Row-major grid positions for `count` nodes.
pub fn grid_positions(count: usize) -> Vec<Position> {
    let columns = grid_columns(count);
    (0..count)
        .map(|i| {
            let col = (i % columns) as f32;
            let row = (i / columns) as f32;
            Position::new(
                GRID_ORIGIN.x + col * GRID_CELL.x,
                GRID_ORIGIN.y + row * GRID_CELL.y,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_steps_diagonally() {
        assert_eq!(cascade_position(0), Position::new(120.0, 100.0));
        assert_eq!(cascade_position(1), Position::new(160.0, 124.0));
        assert_eq!(cascade_position(5), Position::new(320.0, 220.0));
    }

    #[test]
    fn test_grid_column_counts() {
        assert_eq!(grid_columns(0), 1);
        assert_eq!(grid_columns(1), 1);
        assert_eq!(grid_columns(4), 2);
        assert_eq!(grid_columns(5), 3);
        assert_eq!(grid_columns(9), 3);
        assert_eq!(grid_columns(10), 4);
    }

    #[test]
    fn test_grid_positions_for_five_nodes() {
        let positions = grid_positions(5);
        assert_eq!(
            positions,
            vec![
                Position::new(80.0, 80.0),
                Position::new(200.0, 80.0),
                Position::new(320.0, 80.0),
                Position::new(80.0, 150.0),
                Position::new(200.0, 150.0),
            ]
        );
    }

    #[test]
    fn test_grid_positions_empty() {
        assert!(grid_positions(0).is_empty());
    }
}
