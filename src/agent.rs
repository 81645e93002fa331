use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::grid::{get_neighbors, Cell};
use crate::sentence::Sentence;

///
/// The agent's evolving knowledge of one game: which cells it has probed,
/// which it has proven safe or proven to be mines, and the unresolved count
/// constraints relating the rest.
///
/// Terms:
/// safe cell: proven to hold no mine (every probed cell is safe by contract)
/// mine cell: proven to hold a mine
/// unknown cell: neither of the above; sentences only ever mention cells that
/// are not yet proven safe
///
pub struct Agent {
    nrows: usize,
    ncols: usize,
    moves_made: FxHashSet<Cell>,
    safes: FxHashSet<Cell>,
    mines: FxHashSet<Cell>,
    knowledge: Vec<Sentence>,
}

impl Agent {
    pub fn new(nrows: usize, ncols: usize) -> Agent {
        Agent {
            nrows,
            ncols,
            moves_made: FxHashSet::default(),
            safes: FxHashSet::default(),
            mines: FxHashSet::default(),
            knowledge: Vec::new(),
        }
    }

    pub fn moves_made(&self) -> &FxHashSet<Cell> {
        &self.moves_made
    }

    pub fn known_safes(&self) -> &FxHashSet<Cell> {
        &self.safes
    }

    pub fn known_mines(&self) -> &FxHashSet<Cell> {
        &self.mines
    }

    /// The unresolved sentences. Unordered and duplicate-free.
    pub fn knowledge(&self) -> &[Sentence] {
        &self.knowledge
    }

    ///
    /// Ingests one probe report: `cell` was probed and `count` of its
    /// neighbors are mines. The probed cell becomes a made move and a known
    /// safe, the count becomes a new sentence over the still-unknown
    /// neighbors, and inference runs to a fixpoint before returning.
    ///
    /// Probing the same cell twice, or reporting a count that disagrees with
    /// the actual layout, violates the caller's contract; the resulting
    /// conclusions are garbage.
    ///
    pub fn record_observation(&mut self, cell: Cell, count: usize) {
        debug_assert!(
            !self.moves_made.contains(&cell),
            "cell {:?} probed twice",
            cell
        );
        debug_assert!(count <= 8, "impossible neighbor mine count {}", count);

        self.moves_made.insert(cell);
        self.mark_safe(cell);

        // Constrain only neighbors whose status is still open. Mines already
        // proven are accounted for by lowering the count, keeping the new
        // sentence in the same normal form as the stored ones.
        let mut cells: FxHashSet<Cell> = FxHashSet::default();
        let mut remaining = count;
        for neighbor in get_neighbors(self.nrows, self.ncols, cell) {
            if self.safes.contains(&neighbor) {
                continue;
            }
            if self.mines.contains(&neighbor) {
                debug_assert!(
                    remaining > 0,
                    "count for {:?} does not cover known mine {:?}",
                    cell,
                    neighbor
                );
                remaining -= 1;
                continue;
            }
            cells.insert(neighbor);
        }
        if !cells.is_empty() {
            let sentence = Sentence::new(cells, remaining);
            if !self.knowledge.contains(&sentence) {
                trace!(%sentence, "observed");
                self.knowledge.push(sentence);
            }
        }

        self.run_inference();
    }

    ///
    /// Any not-yet-probed cell already proven safe, or None. Pure query; the
    /// pick among equally good candidates is arbitrary.
    ///
    pub fn next_safe_move(&self) -> Option<Cell> {
        self.safes.difference(&self.moves_made).next().copied()
    }

    ///
    /// A uniformly random cell that has not been probed and is not a known
    /// mine, or None once no such cell is left. Fallback for when
    /// [`Agent::next_safe_move`] comes up empty.
    ///
    pub fn next_unknown_move(&self, rng: &mut impl Rng) -> Option<Cell> {
        let mut candidates = Vec::with_capacity(self.nrows * self.ncols);
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                let cell = (i, j);
                if !self.moves_made.contains(&cell) && !self.mines.contains(&cell) {
                    candidates.push(cell);
                }
            }
        }
        candidates.choose(rng).copied()
    }

    /// Records `cell` as safe and strips it from every sentence. Returns
    /// whether the cell was newly proven.
    fn mark_safe(&mut self, cell: Cell) -> bool {
        if !self.safes.insert(cell) {
            return false;
        }
        debug_assert!(
            !self.mines.contains(&cell),
            "cell {:?} proven both safe and mine",
            cell
        );
        for sentence in &mut self.knowledge {
            sentence.mark_safe(cell);
        }
        true
    }

    /// Records `cell` as a mine and strips it from every sentence, lowering
    /// their counts. Returns whether the cell was newly proven.
    fn mark_mine(&mut self, cell: Cell) -> bool {
        if !self.mines.insert(cell) {
            return false;
        }
        debug_assert!(
            !self.safes.contains(&cell),
            "cell {:?} proven both mine and safe",
            cell
        );
        for sentence in &mut self.knowledge {
            sentence.mark_mine(cell);
        }
        true
    }

    ///
    /// Interleaves the two inference passes until a full round changes
    /// nothing. Cell sets only ever shrink and every derived sentence covers
    /// a strictly smaller remainder, so the loop terminates.
    ///
    fn run_inference(&mut self) {
        let mut changed = true;
        while changed {
            changed = self.deduce();
            changed |= self.infer_from_subsets();
        }
    }

    ///
    /// Resolves every sentence that pins all of its cells one way: count
    /// zero means all safe, count equal to set size means all mines.
    /// Marking strips cells from the other sentences and may expose more
    /// resolvable ones, so the sweep repeats until it resolves nothing.
    ///
    fn deduce(&mut self) -> bool {
        let mut changed = false;
        loop {
            let mut newly_safe: Vec<Cell> = Vec::new();
            let mut newly_mined: Vec<Cell> = Vec::new();
            for sentence in &self.knowledge {
                if let Some(cells) = sentence.known_safes() {
                    newly_safe.extend(cells.iter().copied());
                } else if let Some(cells) = sentence.known_mines() {
                    newly_mined.extend(cells.iter().copied());
                }
            }
            if newly_safe.is_empty() && newly_mined.is_empty() {
                return changed;
            }
            changed = true;
            for cell in newly_safe {
                if self.mark_safe(cell) {
                    debug!(?cell, "deduced safe");
                }
            }
            for cell in newly_mined {
                if self.mark_mine(cell) {
                    debug!(?cell, "deduced mine");
                }
            }
            self.knowledge.retain(|sentence| {
                if sentence.is_empty() {
                    debug_assert_eq!(
                        0,
                        sentence.count(),
                        "emptied sentence still claims mines"
                    );
                    return false;
                }
                true
            });
            self.dedup_knowledge();
        }
    }

    ///
    /// Subset rule: for sentences A ⊆ B, the cells of B outside A must hold
    /// exactly the mines B counts beyond A's. Derived sentences join the
    /// knowledge base after the scan completes and take part in the next
    /// round, never in the scan that produced them.
    ///
    fn infer_from_subsets(&mut self) -> bool {
        let mut derived: Vec<Sentence> = Vec::new();
        for (i, smaller) in self.knowledge.iter().enumerate() {
            for (j, larger) in self.knowledge.iter().enumerate() {
                if i == j || !smaller.is_subset_of(larger) {
                    continue;
                }
                let difference = larger.subtract(smaller);
                if difference.is_empty()
                    || self.knowledge.contains(&difference)
                    || derived.contains(&difference)
                {
                    continue;
                }
                trace!(sentence = %difference, "derived from subset");
                derived.push(difference);
            }
        }
        let changed = !derived.is_empty();
        self.knowledge.extend(derived);
        changed
    }

    /// Collapses exact duplicates to a single stored sentence.
    fn dedup_knowledge(&mut self) {
        let mut i = 0;
        while i < self.knowledge.len() {
            if self.knowledge[..i].contains(&self.knowledge[i]) {
                self.knowledge.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }
}
