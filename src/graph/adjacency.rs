use ahash::AHashMap;

use crate::{error::{DiscretizeError, DiscretizeResult}, index::CellIndexer};
use super::Neighborhood;

/// Grid indices (`iy * nx + ix`) of the in-bounds neighbors of square `(ix, iy)`.
pub fn grid_neighbors(ix: usize, iy: usize, nx: usize, ny: usize, neighborhood: Neighborhood) -> Vec<usize> {
    neighborhood.offsets().iter()
        .filter_map(|&(dx, dy)| {
            let (x, y) = (ix as i64 + dx, iy as i64 + dy);
            (x >= 0 && y >= 0 && x < nx as i64 && y < ny as i64)
                .then(|| y as usize * nx + x as usize)
        })
        .collect()
}

/// Neighbor lists for a hex cover, as positions into `cells`.
///
/// Ring members outside the cover are omitted. A regular cell whose ring
/// size differs from the tessellation's is a topology error.
pub fn hex_adjacency<I: CellIndexer>(cells: &[I::Cell], indexer: &I) -> DiscretizeResult<Vec<Vec<u32>>> {
    let position = cells.iter().enumerate()
        .map(|(i, &cell)| (cell, i as u32))
        .collect::<AHashMap<_, _>>();

    cells.iter().enumerate()
        .map(|(i, &cell)| {
            let ring = indexer.ring(cell);
            if !indexer.is_irregular(cell) && ring.len() != indexer.expected_ring_size() {
                return Err(DiscretizeError::InconsistentTopology {
                    cell: indexer.cell_id(cell),
                    reason: format!("ring has {} cells, expected {}", ring.len(), indexer.expected_ring_size()),
                })
            }

            let mut neighbors = ring.into_iter()
                .filter_map(|other| position.get(&other).copied())
                .filter(|&j| j as usize != i)
                .collect::<Vec<_>>();
            neighbors.sort_unstable();
            neighbors.dedup();
            Ok(neighbors)
        })
        .collect()
}

/// Remap pre-clip grid neighbors onto the pieces that survived clipping.
///
/// `pieces[row]` is the grid index of the square that row was cut from; a
/// square split by the region boundary appears once per piece. Every piece
/// of a neighboring square is a neighbor, pieces of one square are not
/// neighbors of each other, and dropped squares simply disappear.
pub fn reindex_after_clip(pieces: &[usize], nx: usize, ny: usize, neighborhood: Neighborhood) -> DiscretizeResult<Vec<Vec<u32>>> {
    let mut rows_of_square: AHashMap<usize, Vec<u32>> = AHashMap::new();
    for (row, &square) in pieces.iter().enumerate() {
        if square >= nx * ny {
            return Err(DiscretizeError::invalid("pieces", format!("grid index {square} outside {nx}x{ny} grid")))
        }
        rows_of_square.entry(square).or_default().push(row as u32);
    }

    Ok(pieces.iter()
        .map(|&square| {
            let mut neighbors = grid_neighbors(square % nx, square / nx, nx, ny, neighborhood).into_iter()
                .filter_map(|other| rows_of_square.get(&other))
                .flatten()
                .copied()
                .collect::<Vec<_>>();
            neighbors.sort_unstable();
            neighbors
        })
        .collect())
}

/// Reject neighbor lists that reference themselves or rows outside the table.
pub fn check_adjacency(ids: &[String], neighbors: &[Vec<u32>]) -> DiscretizeResult<()> {
    if ids.len() != neighbors.len() {
        return Err(DiscretizeError::invalid("neighbors", format!("{} lists for {} cells", neighbors.len(), ids.len())))
    }
    for (i, list) in neighbors.iter().enumerate() {
        if let Some(&bad) = list.iter().find(|&&j| j as usize == i || j as usize >= ids.len()) {
            let reason = if bad as usize == i { "lists itself as a neighbor".to_string() }
                else { format!("references row {bad} outside the table") };
            return Err(DiscretizeError::InconsistentTopology { cell: ids[i].clone(), reason })
        }
    }
    Ok(())
}

/// True when every edge `i -> j` has a matching `j -> i`.
pub fn is_symmetric(neighbors: &[Vec<u32>]) -> bool {
    neighbors.iter().enumerate().all(|(i, list)| {
        list.iter().all(|&j| neighbors.get(j as usize)
            .is_some_and(|back| back.contains(&(i as u32))))
    })
}

#[cfg(test)]
mod tests {
    use geo::{point, LineString, Point, Polygon};

    use super::*;

    /// Cells on a line, padded to six ring members with cells far away.
    /// Cell -5 is irregular with five; cell 99 is broken with two.
    struct LineIndexer;

    impl CellIndexer for LineIndexer {
        type Cell = i32;

        fn max_resolution(&self) -> u8 { 0 }
        fn cover(&self, _: &Polygon<f64>, _: u8) -> DiscretizeResult<Vec<i32>> { Ok(vec![]) }
        fn ring(&self, cell: i32) -> Vec<i32> {
            match cell {
                99 => vec![98, 100],
                -5 => vec![-4, -6, 1000, 1001, 1002],
                _ => vec![cell - 1, cell + 1, 1000 + cell, 2000 + cell, 3000 + cell, 4000 + cell],
            }
        }
        fn center(&self, cell: i32) -> Point<f64> { point!(x: cell as f64, y: 0.0) }
        fn boundary(&self, _: i32) -> Polygon<f64> { Polygon::new(LineString::new(vec![]), vec![]) }
        fn area(&self, _: i32) -> f64 { 1.0 }
        fn is_irregular(&self, cell: i32) -> bool { cell == -5 }
        fn cell_id(&self, cell: i32) -> String { cell.to_string() }
    }

    #[test]
    fn rook_corner_and_interior() {
        assert_eq!(grid_neighbors(0, 0, 3, 3, Neighborhood::Rook), vec![1, 3]);
        assert_eq!(grid_neighbors(1, 1, 3, 3, Neighborhood::Rook), vec![5, 3, 7, 1]);
    }

    #[test]
    fn queen_adds_diagonals_within_bounds() {
        let mut corner = grid_neighbors(2, 2, 3, 3, Neighborhood::Queen);
        corner.sort_unstable();
        assert_eq!(corner, vec![4, 5, 7]);
        assert_eq!(grid_neighbors(1, 1, 3, 3, Neighborhood::Queen).len(), 8);
    }

    #[test]
    fn non_square_grid_uses_row_width() {
        // 4 wide, 2 tall: square (3, 0) is index 3, its north neighbor is 7.
        let mut found = grid_neighbors(3, 0, 4, 2, Neighborhood::Rook);
        found.sort_unstable();
        assert_eq!(found, vec![2, 7]);
    }

    #[test]
    fn hex_ring_is_restricted_to_cover() {
        let adjacency = hex_adjacency(&[1, 2, 3, 7], &LineIndexer).unwrap();
        assert_eq!(adjacency, vec![vec![1], vec![0, 2], vec![1], vec![]]);
        assert!(is_symmetric(&adjacency));
    }

    #[test]
    fn irregular_cell_may_have_short_ring() {
        let adjacency = hex_adjacency(&[-6, -5, -4], &LineIndexer).unwrap();
        assert_eq!(adjacency[1], vec![0, 2]);
    }

    #[test]
    fn short_ring_on_regular_cell_is_inconsistent() {
        let err = hex_adjacency(&[98, 99, 100], &LineIndexer).unwrap_err();
        assert!(matches!(err, DiscretizeError::InconsistentTopology { ref cell, .. } if cell == "99"));
    }

    #[test]
    fn clipped_grid_drops_missing_squares() {
        // 3x1 grid with the middle square clipped away.
        let adjacency = reindex_after_clip(&[0, 2], 3, 1, Neighborhood::Queen).unwrap();
        assert_eq!(adjacency, vec![Vec::<u32>::new(), Vec::<u32>::new()]);
    }

    #[test]
    fn split_square_pieces_are_not_self_neighbors() {
        // 2x1 grid; square 1 was cut into two pieces (rows 1 and 2).
        let adjacency = reindex_after_clip(&[0, 1, 1], 2, 1, Neighborhood::Rook).unwrap();
        assert_eq!(adjacency, vec![vec![1, 2], vec![0], vec![0]]);
        assert!(is_symmetric(&adjacency));
    }

    #[test]
    fn out_of_grid_piece_is_rejected() {
        assert!(reindex_after_clip(&[4], 2, 2, Neighborhood::Rook).is_err());
    }

    #[test]
    fn check_adjacency_rejects_self_and_dangling_rows() {
        let ids = vec!["a".to_string(), "b".to_string()];
        assert!(check_adjacency(&ids, &[vec![1], vec![0]]).is_ok());
        assert!(check_adjacency(&ids, &[vec![0], vec![]]).is_err());
        assert!(check_adjacency(&ids, &[vec![2], vec![]]).is_err());
        assert!(check_adjacency(&ids, &[vec![]]).is_err());
        assert!(!is_symmetric(&[vec![1], vec![]]));
    }
}
