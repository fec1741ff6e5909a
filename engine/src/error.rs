use rules::{PieceKind, Square};
use thiserror::Error;

/// 레벨 구성 오류. 레벨 로드를 중단해야 한다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("invalid board size {rows}x{cols}")]
    InvalidSize { rows: i32, cols: i32 },
    #[error("level grid is empty")]
    EmptyGrid,
    #[error("row {row} has {len} cells, expected {expected}")]
    RaggedRow { row: usize, len: usize, expected: usize },
    #[error("({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfBounds { row: i32, col: i32, rows: i32, cols: i32 },
    #[error("unknown piece id {id} at ({row}, {col})")]
    UnknownPieceId { row: i32, col: i32, id: i32 },
    #[error("conflicting roles assigned to ({}, {})", .square.row, .square.col)]
    ConflictingRole { square: Square },
    #[error("player piece already placed at ({}, {})", .existing.row, .existing.col)]
    SecondPlayer { existing: Square },
    #[error("level has no player piece")]
    MissingPlayer,
    #[error("level has no objective cell")]
    MissingObjective,
    #[error("board setup is locked once the capture map has been generated")]
    CaptureMapLocked,
    #[error("invalid level descriptor: {0}")]
    InvalidDescriptor(String),
}

/// 이동 거부. 상태는 바뀌지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no player piece on the board")]
    NoPlayer,
    #[error("({}, {}) is outside the board", .target.row, .target.col)]
    OutOfBounds { target: Square },
    #[error("{} cannot move from ({}, {}) to ({}, {})", .kind.name(), .from.row, .from.col, .to.row, .to.col)]
    IllegalMove {
        kind: PieceKind,
        from: Square,
        to: Square,
    },
    #[error("({}, {}) is attacked by {} opponent piece(s)", .target.row, .target.col, .attackers.len())]
    SquareUnderAttack {
        target: Square,
        attackers: Vec<Square>,
    },
}
