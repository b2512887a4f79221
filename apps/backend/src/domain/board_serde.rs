//! Serialization and deserialization for board types.
//!
//! Players travel as the numbers `1`/`2`, cells as `null`/`1`/`2`, and a board
//! as an 8x8 array of cells. The browser client exchanges boards as a JSON
//! *string* holding that array, which is what [`SerializedBoard`] produces.

use serde::de::Error as DeError;
use serde::ser::Error as SerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::board::{Board, Cell, Player, BOARD_SIZE};

impl Serialize for Player {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.number())
    }
}

impl<'de> Deserialize<'de> for Player {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = u8::deserialize(deserializer)?;
        Player::from_number(n).ok_or_else(|| D::Error::custom(format!("Invalid player: {n}")))
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.player().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Player>::deserialize(deserializer)? {
            Some(player) => Cell::Occupied(player),
            None => Cell::Empty,
        })
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.rows().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<Vec<Cell>>::deserialize(deserializer)?;
        if rows.len() != BOARD_SIZE {
            return Err(D::Error::custom(format!(
                "Board must have {BOARD_SIZE} rows, got {}",
                rows.len()
            )));
        }

        let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (r, row) in rows.into_iter().enumerate() {
            cells[r] = row.try_into().map_err(|row: Vec<Cell>| {
                D::Error::custom(format!(
                    "Board row {r} must have {BOARD_SIZE} cells, got {}",
                    row.len()
                ))
            })?;
        }
        Ok(Board::from_rows(cells))
    }
}

/// Board encoded as a JSON string on output. On input both the string form
/// and a plain nested array are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedBoard(pub Board);

impl SerializedBoard {
    pub fn into_inner(self) -> Board {
        self.0
    }
}

impl From<Board> for SerializedBoard {
    fn from(board: Board) -> Self {
        SerializedBoard(board)
    }
}

impl Serialize for SerializedBoard {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = serde_json::to_string(&self.0).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EncodedBoard {
    Text(String),
    Rows(Board),
}

impl<'de> Deserialize<'de> for SerializedBoard {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match EncodedBoard::deserialize(deserializer)? {
            EncodedBoard::Rows(board) => Ok(SerializedBoard(board)),
            EncodedBoard::Text(text) => serde_json::from_str::<Board>(&text)
                .map(SerializedBoard)
                .map_err(|err| D::Error::custom(format!("Invalid board snapshot: {err}"))),
        }
    }
}
