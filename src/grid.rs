///
/// Common grid functions
///

/// A board coordinate as (row, col), row-major.
pub type Cell = (usize, usize);

///
/// All in-bounds cells adjacent to `cell` by an edge or a corner, excluding
/// `cell` itself. At most 8.
///
pub fn get_neighbors(nrows: usize, ncols: usize, cell: Cell) -> Vec<Cell> {
    let (row, col) = cell;
    debug_assert!(
        row < nrows && col < ncols,
        "cell {:?} out of bounds for {} x {} grid",
        cell,
        nrows,
        ncols
    );
    let row_lo = row.saturating_sub(1);
    let row_hi = (row + 1).min(nrows - 1);
    let col_lo = col.saturating_sub(1);
    let col_hi = (col + 1).min(ncols - 1);

    let mut neighbors = Vec::with_capacity(8);
    for i in row_lo..=row_hi {
        for j in col_lo..=col_hi {
            if (i, j) != cell {
                neighbors.push((i, j));
            }
        }
    }
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_cell_has_eight_neighbors() {
        let mut neighbors = get_neighbors(3, 3, (1, 1));
        neighbors.sort();
        assert_eq!(
            vec![
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 0),
                (1, 2),
                (2, 0),
                (2, 1),
                (2, 2),
            ],
            neighbors
        );
    }

    #[test]
    fn test_corner_cell_has_three_neighbors() {
        let mut neighbors = get_neighbors(3, 3, (2, 2));
        neighbors.sort();
        assert_eq!(vec![(1, 1), (1, 2), (2, 1)], neighbors);
    }

    #[test]
    fn test_edge_cell_has_five_neighbors() {
        let mut neighbors = get_neighbors(3, 3, (0, 1));
        neighbors.sort();
        assert_eq!(vec![(0, 0), (0, 2), (1, 0), (1, 1), (1, 2)], neighbors);
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbors() {
        assert!(get_neighbors(1, 1, (0, 0)).is_empty());
    }

    #[test]
    fn test_single_row_grid() {
        let mut neighbors = get_neighbors(1, 4, (0, 2));
        neighbors.sort();
        assert_eq!(vec![(0, 1), (0, 3)], neighbors);
    }
}
