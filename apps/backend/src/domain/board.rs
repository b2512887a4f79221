//! Board model: players, cells, positions and the 8x8 grid.

use std::fmt;
use std::str::FromStr;

use crate::domain::errors::Rejection;

pub const BOARD_SIZE: usize = 8;

/// Rows filled with pieces at the start of a game, per side.
const HOME_ROWS: usize = 3;

/// One of the two participants. Wire value is `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    /// Starts on rows 5..=7 and moves toward row 0. Always moves first.
    One,
    /// Starts on rows 0..=2 and moves toward row 7.
    Two,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn from_number(number: u8) -> Option<Player> {
        match number {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    /// Zero-based slot index (player 1 -> 0).
    pub fn index(self) -> usize {
        self.number() as usize - 1
    }

    pub fn from_index(index: usize) -> Option<Player> {
        match index {
            0 => Some(Player::One),
            1 => Some(Player::Two),
            _ => None,
        }
    }

    /// Row delta of a single forward step.
    pub fn forward(self) -> i8 {
        match self {
            Player::One => -1,
            Player::Two => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Player),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }

    pub fn holds(self, player: Player) -> bool {
        self == Cell::Occupied(player)
    }
}

/// A square on the board. Construction guarantees both coordinates are in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Option<Position> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Position { row, col })
        } else {
            None
        }
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// Dark squares are the playable ones: `(row + col)` is odd.
    pub fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Position> {
        let row = i16::from(self.row) + i16::from(d_row);
        let col = i16::from(self.col) + i16::from(d_col);
        if row < 0 || col < 0 {
            return None;
        }
        Position::new(row as u8, col as u8)
    }

    /// Every square, row-major.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE as u8)
            .flat_map(|row| (0..BOARD_SIZE as u8).map(move |col| Position { row, col }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn empty() -> Board {
        Board::default()
    }

    /// Standard opening layout: player 2 on the dark squares of rows 0..=2,
    /// player 1 on the dark squares of rows 5..=7.
    pub fn initial() -> Board {
        let mut board = Board::empty();
        for pos in Position::all().filter(|p| p.is_dark()) {
            let row = pos.row() as usize;
            if row < HOME_ROWS {
                board.set(pos, Cell::Occupied(Player::Two));
            } else if row >= BOARD_SIZE - HOME_ROWS {
                board.set(pos, Cell::Occupied(Player::One));
            }
        }
        board
    }

    pub fn from_rows(cells: [[Cell; BOARD_SIZE]; BOARD_SIZE]) -> Board {
        Board { cells }
    }

    pub fn rows(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.row() as usize][pos.col() as usize]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.row() as usize][pos.col() as usize] = cell;
    }

    /// Squares currently holding one of `player`'s pieces.
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(move |pos| self.get(*pos).holds(player))
    }

    pub fn piece_count(&self, player: Player) -> usize {
        self.pieces(player).count()
    }
}

pub fn initial_board() -> Board {
    Board::initial()
}

pub fn piece_count(board: &Board, player: Player) -> usize {
    board.piece_count(player)
}

/// Renders one row per line using `.`, `1` and `2`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let c = match cell {
                    Cell::Empty => '.',
                    Cell::Occupied(Player::One) => '1',
                    Cell::Occupied(Player::Two) => '2',
                };
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// Parses the `Display` diagram. Whitespace inside a line and blank lines are
/// ignored, so fixtures can be written as indented block strings.
impl FromStr for Board {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<Vec<char>> = s
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        if rows.len() != BOARD_SIZE {
            return Err(Rejection::MalformedMove);
        }

        let mut board = Board::empty();
        for (r, row) in rows.iter().enumerate() {
            if row.len() != BOARD_SIZE {
                return Err(Rejection::MalformedMove);
            }
            for (c, ch) in row.iter().enumerate() {
                let cell = match ch {
                    '.' => Cell::Empty,
                    '1' => Cell::Occupied(Player::One),
                    '2' => Cell::Occupied(Player::Two),
                    _ => return Err(Rejection::MalformedMove),
                };
                board.cells[r][c] = cell;
            }
        }
        Ok(board)
    }
}
