//! Text rendering of the board.
//!
//! Walks the public node structure: a border around the root bounds, one
//! horizontal and one vertical line through each internal node's midpoint
//! (spanning that node's bounds only), and a `*` marker for every stored
//! point.

use quadtree::{Bounds, NodeKind, QuadTreeNode};

/// Renders a quad tree into a fixed-size character grid.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    /// Grid width in characters.
    columns: usize,
    /// Grid height in characters.
    rows: usize,
}

impl TextRenderer {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(2),
            rows: rows.max(2),
        }
    }

    /// Render the subtree rooted at `root` into a newline-joined grid.
    pub fn render(&self, root: &QuadTreeNode) -> String {
        let mut grid = vec![vec![' '; self.columns]; self.rows];
        let board = root.bounds();

        self.draw_border(&mut grid);
        self.draw_lines(&mut grid, board, root);
        self.draw_markers(&mut grid, board, root);

        let lines: Vec<String> = grid
            .into_iter()
            .map(|row| row.into_iter().collect())
            .collect();
        lines.join("\n")
    }

    /// Map a board x coordinate to a grid column.
    fn col(&self, board: Bounds, x: f64) -> usize {
        let width = board.width();
        let t = if width > 0.0 {
            (x - board.min().x) / width
        } else {
            0.0
        };
        ((t * (self.columns - 1) as f64).round() as usize).min(self.columns - 1)
    }

    /// Map a board y coordinate to a grid row. Board y grows upward, grid
    /// rows grow downward.
    fn row(&self, board: Bounds, y: f64) -> usize {
        let height = board.height();
        let t = if height > 0.0 {
            (board.max().y - y) / height
        } else {
            0.0
        };
        ((t * (self.rows - 1) as f64).round() as usize).min(self.rows - 1)
    }

    fn draw_border(&self, grid: &mut [Vec<char>]) {
        let (last_row, last_col) = (self.rows - 1, self.columns - 1);
        for col in 0..self.columns {
            grid[0][col] = '-';
            grid[last_row][col] = '-';
        }
        for row in grid.iter_mut() {
            row[0] = '|';
            row[last_col] = '|';
        }
        grid[0][0] = '+';
        grid[0][last_col] = '+';
        grid[last_row][0] = '+';
        grid[last_row][last_col] = '+';
    }

    /// Draw the subdivision cross of every internal node, recursively.
    fn draw_lines(&self, grid: &mut [Vec<char>], board: Bounds, node: &QuadTreeNode) {
        let NodeKind::Internal(children) = node.kind() else {
            return;
        };

        let bounds = node.bounds();
        let midpoint = bounds.midpoint();

        let row = self.row(board, midpoint.y);
        for col in self.col(board, bounds.min().x)..=self.col(board, bounds.max().x) {
            put(grid, row, col, '-');
        }

        let col = self.col(board, midpoint.x);
        for row in self.row(board, bounds.max().y)..=self.row(board, bounds.min().y) {
            put(grid, row, col, '|');
        }

        for child in children.iter() {
            self.draw_lines(grid, board, child);
        }
    }

    /// Draw a marker for every stored point, recursively. Runs after the
    /// lines so markers stay visible at crossings.
    fn draw_markers(&self, grid: &mut [Vec<char>], board: Bounds, node: &QuadTreeNode) {
        match node.kind() {
            NodeKind::Leaf(points) => {
                for point in points {
                    let (row, col) = (self.row(board, point.y), self.col(board, point.x));
                    grid[row][col] = '*';
                }
            }
            NodeKind::Internal(children) => {
                for child in children.iter() {
                    self.draw_markers(grid, board, child);
                }
            }
        }
    }
}

/// Write a line character, merging perpendicular crossings into `+`.
fn put(grid: &mut [Vec<char>], row: usize, col: usize, ch: char) {
    let cell = &mut grid[row][col];
    let crosses = match ch {
        '-' => *cell == '|',
        '|' => *cell == '-',
        _ => false,
    };
    *cell = if crosses || *cell == '+' { '+' } else { ch };
}
