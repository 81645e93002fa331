use std::fmt;

use rand::Rng;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::grid::{get_neighbors, Cell};

/// Ground-truth representation of a game (i.e. where the mines are).
///
/// The mine set is fixed at construction; the only mutable piece of state is
/// the set of cells the player has flagged as mines, which exists to answer
/// [`MineMap::is_won`].
#[derive(Debug, Clone, PartialEq)]
pub struct MineMap {
    nrows: usize,
    ncols: usize,
    mines: FxHashSet<Cell>,
    flagged: FxHashSet<Cell>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("too many mines: requested {nmines} for a {nrows} x {ncols} map")]
    TooManyMines {
        nrows: usize,
        ncols: usize,
        nmines: usize,
    },
}

impl MineMap {
    ///
    /// Generates a new nrows x ncols mine map with nmines mines distributed
    /// across the map uniformly at random: candidate cells are drawn from the
    /// whole grid and re-drawn whenever they land on an already-picked mine.
    ///
    pub fn generate(
        nrows: usize,
        ncols: usize,
        nmines: usize,
        rng: &mut impl Rng,
    ) -> Result<MineMap, MapError> {
        if nmines > nrows * ncols {
            return Err(MapError::TooManyMines {
                nrows,
                ncols,
                nmines,
            });
        }
        let mut mines = FxHashSet::default();
        while mines.len() < nmines {
            mines.insert((rng.gen_range(0..nrows), rng.gen_range(0..ncols)));
        }
        Ok(MineMap {
            nrows,
            ncols,
            mines,
            flagged: FxHashSet::default(),
        })
    }

    /// Builds a map from an explicit mine layout. All cells must be in bounds.
    pub fn from_mines(
        nrows: usize,
        ncols: usize,
        mines: impl IntoIterator<Item = Cell>,
    ) -> MineMap {
        let mines: FxHashSet<Cell> = mines.into_iter().collect();
        debug_assert!(
            mines.iter().all(|&(i, j)| i < nrows && j < ncols),
            "mine out of bounds for {} x {} map",
            nrows,
            ncols
        );
        MineMap {
            nrows,
            ncols,
            mines,
            flagged: FxHashSet::default(),
        }
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nmines(&self) -> usize {
        self.mines.len()
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    ///
    /// Number of mines among the up-to-8 cells adjacent to `cell`, not
    /// including `cell` itself.
    ///
    pub fn neighbor_mine_count(&self, cell: Cell) -> usize {
        get_neighbors(self.nrows, self.ncols, cell)
            .into_iter()
            .filter(|neighbor| self.mines.contains(neighbor))
            .count()
    }

    /// Flags `cell` as a suspected mine. Idempotent.
    pub fn flag(&mut self, cell: Cell) {
        debug_assert!(
            cell.0 < self.nrows && cell.1 < self.ncols,
            "flagged cell {:?} out of bounds",
            cell
        );
        self.flagged.insert(cell);
    }

    /// The game is won when the flagged set matches the mine set exactly.
    pub fn is_won(&self) -> bool {
        self.flagged == self.mines
    }
}

impl fmt::Display for MineMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nrows: {}, ncols: {}", self.nrows, self.ncols)?;
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                write!(f, "{} ", if self.mines.contains(&(i, j)) { "x" } else { "-" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn validate_mine_map(mine_map: &MineMap, nrows: usize, ncols: usize, nmines: usize) {
        assert_eq!(nrows, mine_map.nrows());
        assert_eq!(ncols, mine_map.ncols());
        assert_eq!(nmines, mine_map.nmines());
        let mut nmines_seen: usize = 0;
        for i in 0..nrows {
            for j in 0..ncols {
                if mine_map.is_mine((i, j)) {
                    nmines_seen += 1;
                }
            }
        }
        assert_eq!(nmines, nmines_seen);
    }

    #[test]
    fn test_generate_small_mine_map() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let mine_map = MineMap::generate(3, 3, 3, &mut rng).unwrap();
            println!("{}", mine_map);
            validate_mine_map(&mine_map, 3, 3, 3);
        }
    }

    #[test]
    fn test_generate_large_mine_map() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let mine_map = MineMap::generate(40, 40, 40, &mut rng).unwrap();
            validate_mine_map(&mine_map, 40, 40, 40);
        }
    }

    #[test]
    fn test_generate_empty_mine_map() {
        let mut rng = StdRng::seed_from_u64(7);
        let mine_map = MineMap::generate(3, 3, 0, &mut rng).unwrap();
        validate_mine_map(&mine_map, 3, 3, 0);
    }

    #[test]
    fn test_generate_full_mine_map() {
        let mut rng = StdRng::seed_from_u64(7);
        let mine_map = MineMap::generate(4, 3, 12, &mut rng).unwrap();
        validate_mine_map(&mine_map, 4, 3, 12);
    }

    #[test]
    fn test_generate_overfull_mine_map() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            Err(MapError::TooManyMines {
                nrows: 4,
                ncols: 3,
                nmines: 13
            }),
            MineMap::generate(4, 3, 13, &mut rng)
        );
    }

    #[test]
    fn test_neighbor_mine_count() {
        let mine_map = MineMap::from_mines(3, 3, [(0, 0), (1, 0), (1, 1)]);
        assert_eq!(3, mine_map.neighbor_mine_count((0, 1)));
        assert_eq!(2, mine_map.neighbor_mine_count((1, 1)));
        assert_eq!(1, mine_map.neighbor_mine_count((2, 2)));
        assert_eq!(3, mine_map.neighbor_mine_count((2, 1)));
        assert_eq!(0, mine_map.neighbor_mine_count((0, 2)));
    }

    #[test]
    fn test_is_won_requires_exact_flag_set() {
        let mut mine_map = MineMap::from_mines(3, 3, [(0, 0), (2, 2)]);
        assert!(!mine_map.is_won());

        mine_map.flag((0, 0));
        assert!(!mine_map.is_won());

        mine_map.flag((2, 2));
        assert!(mine_map.is_won());

        // Flagging again changes nothing.
        mine_map.flag((2, 2));
        assert!(mine_map.is_won());

        // A spurious extra flag breaks the win condition.
        mine_map.flag((1, 1));
        assert!(!mine_map.is_won());
    }
}
