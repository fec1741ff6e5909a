//! 레벨 설명 (정수 그리드 + 메타데이터)
//!
//! 그리드 값: `0` 빈 칸, `1..=6` 플레이어 기물 번호, `-1..=-6` 상대 기물 번호,
//! `99` 목표 칸.

use rules::PieceKind;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Side};
use crate::error::ConfigurationError;
use crate::host::{GameHost, NullHost};

pub const EMPTY_ID: i32 = 0;
pub const OBJECTIVE_ID: i32 = 99;

/// 그리드 한 칸의 의미
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellCode {
    Empty,
    Objective,
    Piece(PieceKind, Side),
}

impl CellCode {
    pub fn decode(value: i32) -> Option<Self> {
        match value {
            EMPTY_ID => Some(CellCode::Empty),
            OBJECTIVE_ID => Some(CellCode::Objective),
            v if v > 0 => PieceKind::from_id(v).map(|k| CellCode::Piece(k, Side::Player)),
            v => v
                .checked_neg()
                .and_then(PieceKind::from_id)
                .map(|k| CellCode::Piece(k, Side::Opponent)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    #[serde(default)]
    pub name: Option<String>,
    pub grid: Vec<Vec<i32>>,
    /// 최적 해의 수 (점수 계산용)
    #[serde(default, alias = "optimal")]
    pub optimal_moves: Option<usize>,
}

impl Level {
    pub fn new(grid: Vec<Vec<i32>>) -> Self {
        Self {
            name: None,
            grid,
            optimal_moves: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let level: Level = serde_json::from_str(json)
            .map_err(|e| ConfigurationError::InvalidDescriptor(e.to_string()))?;
        level.validate()?;
        Ok(level)
    }

    /// 기본 8x8 나이트 미로
    pub fn classic() -> Self {
        Self {
            name: Some("classic".to_string()),
            grid: vec![
                vec![0, 0, 0, 99, 0, 0, 0, 0],
                vec![0, 0, 0, 0, 0, 0, 0, -5],
                vec![0, 0, 0, 0, 0, 0, 0, 0],
                vec![0, 0, -3, 0, 0, 0, -5, 0],
                vec![0, 0, 0, 0, 0, 0, 0, 0],
                vec![0, 0, -3, 0, 0, 0, 0, 0],
                vec![5, 0, 0, 0, 0, 0, 0, 0],
                vec![0, 0, 0, 0, 0, 0, 0, 0],
            ],
            optimal_moves: Some(21),
        }
    }

    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    pub fn cols(&self) -> usize {
        self.grid.first().map(Vec::len).unwrap_or(0)
    }

    /// 모양(직사각형)과 칸 값만 검사한다. 기물 수 검사는 `build`에서.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let expected = self.cols();
        if self.grid.is_empty() || expected == 0 {
            return Err(ConfigurationError::EmptyGrid);
        }
        for (row, cells) in self.grid.iter().enumerate() {
            if cells.len() != expected {
                return Err(ConfigurationError::RaggedRow {
                    row,
                    len: cells.len(),
                    expected,
                });
            }
            for (col, &id) in cells.iter().enumerate() {
                if CellCode::decode(id).is_none() {
                    return Err(ConfigurationError::UnknownPieceId {
                        row: row as i32,
                        col: col as i32,
                        id,
                    });
                }
            }
        }
        Ok(())
    }

    /// 보드를 만들고 공격 맵까지 생성한다
    pub fn build<H: GameHost>(&self, host: H) -> Result<Board<H>, ConfigurationError> {
        self.validate()?;
        let mut board = Board::with_host(self.rows() as i32, self.cols() as i32, host)?;

        for (row, cells) in self.grid.iter().enumerate() {
            for (col, &id) in cells.iter().enumerate() {
                let (row, col) = (row as i32, col as i32);
                match CellCode::decode(id) {
                    Some(CellCode::Empty) => {}
                    Some(CellCode::Objective) => board.set_objective(row, col)?,
                    Some(CellCode::Piece(kind, side)) => board.set_piece_at(row, col, kind, side)?,
                    None => return Err(ConfigurationError::UnknownPieceId { row, col, id }),
                }
            }
        }

        if board.player_position().is_none() {
            return Err(ConfigurationError::MissingPlayer);
        }
        if board.objectives().is_empty() {
            return Err(ConfigurationError::MissingObjective);
        }

        board.generate_capture_map();
        Ok(board)
    }

    pub fn to_board(&self) -> Result<Board<NullHost>, ConfigurationError> {
        self.build(NullHost)
    }
}
