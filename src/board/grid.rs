//! Board cells, moves and the board itself.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{GameConfig, Player, Result, SimError};

/// Index into the board's row-major cell ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Move(pub u16);

impl Move {
    /// Sentinel value representing "no legal move".
    pub const NONE: Move = Move(u16::MAX);

    /// Create a move from a cell index.
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u16::MAX
    }

    /// Cell index as `usize`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Column letter plus 1-based row, e.g. `b3`, for a board of edge `size`.
    #[must_use]
    pub fn label(self, size: usize) -> String {
        if self.is_none() || size == 0 {
            return "--".to_string();
        }
        let row = self.index() / size;
        let col = self.index() % size;
        format!("{}{}", (b'a' + col as u8) as char, row + 1)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "Move(NONE)")
        } else {
            write!(f, "Move({})", self.0)
        }
    }
}

/// Contents of one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Occupied by a player.
    Taken(Player),
}

impl Cell {
    /// Glyph drawn in a frame.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Taken(player) => player.symbol(),
        }
    }

    /// The occupying player, if any.
    #[must_use]
    pub const fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Taken(player) => Some(player),
        }
    }

    /// Whether the cell is free.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Square grid of cells plus the rules it is judged by.
///
/// Cells are stored row-major; boards up to 8×8 stay inline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    config: GameConfig,
    cells: SmallVec<[Cell; 64]>,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            cells: SmallVec::from_elem(Cell::Empty, config.cell_count()),
        }
    }

    /// Parse a board from glyphs: `X`, `O`, and `.`, `_` or `-` for empty.
    ///
    /// Whitespace and `|` are ignored so rows can be laid out visually.
    ///
    /// ```
    /// use irq_tictactoe::board::{Board, Cell};
    /// use irq_tictactoe::core::{GameConfig, Player};
    ///
    /// let board = Board::from_glyphs(GameConfig::new(3, 3), "X.. .O. ..X").unwrap();
    /// assert_eq!(board.at(1, 1), Cell::Taken(Player::O));
    /// ```
    pub fn from_glyphs(config: GameConfig, glyphs: &str) -> Result<Self> {
        let mut board = Self::new(config);
        let mut index = 0;

        for ch in glyphs.chars().filter(|c| !c.is_whitespace() && *c != '|') {
            if index >= board.cells.len() {
                return Err(SimError::BoardParse(format!(
                    "too many cells for a {}x{} board",
                    config.board_size, config.board_size
                )));
            }
            board.cells[index] = match ch {
                'X' | 'x' => Cell::Taken(Player::X),
                'O' | 'o' => Cell::Taken(Player::O),
                '.' | '_' | '-' => Cell::Empty,
                other => {
                    return Err(SimError::BoardParse(format!("unknown cell glyph {other:?}")))
                }
            };
            index += 1;
        }

        if index != board.cells.len() {
            return Err(SimError::BoardParse(format!(
                "expected {} cells, got {index}",
                board.cells.len()
            )));
        }
        Ok(board)
    }

    /// Rules this board is judged by.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Edge length.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.config.board_size
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at a linear index.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Cell at (row, column).
    #[inline]
    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.config.board_size + col]
    }

    /// Number of empty cells.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    /// Occupy the cell named by `mv`.
    ///
    /// Fails without touching the board if the move is out of range or the
    /// cell is already taken.
    pub fn place(&mut self, mv: Move, player: Player) -> Result<()> {
        match self.cells.get_mut(mv.index()) {
            Some(cell) if cell.is_empty() => {
                *cell = Cell::Taken(player);
                Ok(())
            }
            Some(cell) => Err(SimError::InvalidState(format!(
                "{mv} already taken by {}",
                cell.glyph()
            ))),
            None => Err(SimError::InvalidState(format!("{mv} is off the board"))),
        }
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = Cell::Empty);
    }

    /// Copy of the board with X and O exchanged.
    #[must_use]
    pub fn with_players_swapped(&self) -> Self {
        let mut swapped = self.clone();
        for cell in swapped.cells.iter_mut() {
            if let Cell::Taken(player) = *cell {
                *cell = Cell::Taken(player.opponent());
            }
        }
        swapped
    }
}
