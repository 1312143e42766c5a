/// Grid-toggle ("lights out"): flipping a cell also flips its orthogonal
/// neighbours. Solved when every cell is on.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridToggle {
    size: usize,
    cells: Vec<bool>,
    solved: bool,
}

impl GridToggle {
    /// All cells start on except the row-major indices in `initially_off`.
    /// Out-of-range indices are skipped.
    pub fn new(size: usize, initially_off: &[usize]) -> Self {
        let mut cells = vec![true; size * size];
        for &index in initially_off {
            if let Some(cell) = cells.get_mut(index) {
                *cell = false;
            }
        }
        let solved = cells.iter().all(|&on| on);
        Self {
            size,
            cells,
            solved,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major cell states.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn is_on(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row * self.size + col]
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Toggle `(row, col)` and its in-bounds neighbours. Returns how many
    /// cells flipped, or None if the move was ignored.
    pub fn toggle(&mut self, row: usize, col: usize) -> Option<usize> {
        if self.solved || row >= self.size || col >= self.size {
            return None;
        }
        let mut flipped = 0;
        let mut flip = |r: usize, c: usize| {
            let cell = &mut self.cells[r * self.size + c];
            *cell = !*cell;
            flipped += 1;
        };
        flip(row, col);
        if row > 0 {
            flip(row - 1, col);
        }
        if row + 1 < self.size {
            flip(row + 1, col);
        }
        if col > 0 {
            flip(row, col - 1);
        }
        if col + 1 < self.size {
            flip(row, col + 1);
        }
        self.solved = self.cells.iter().all(|&on| on);
        Some(flipped)
    }

    pub fn toggle_index(&mut self, index: usize) -> Option<usize> {
        if self.size == 0 {
            return None;
        }
        self.toggle(index / self.size, index % self.size)
    }
}
