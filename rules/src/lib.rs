//! 체스 미로용 기물 규칙 테이블.
//!
//! 기물 종류별로 "모양" 규칙(출발/도착 칸의 기하학적 관계만 본다)과
//! 공격 범위(슬라이드 방향 또는 고정 점프 오프셋)를 한 곳에 모아 둔다.
//! 보드 상태는 모른다. 점유 여부는 호출하는 쪽이 클로저로 넘겨준다.

use std::iter::FusedIterator;

use log::trace;
use serde::{Deserialize, Serialize};

/// 보드 좌표 (0-indexed: row=0이 맨 윗줄, col=0이 맨 왼쪽 열)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub row: i32,
    pub col: i32,
}

impl Square {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// 상대 이동 (d_row, d_col) 적용
    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }

    /// `offset`과 같지만 i32 범위를 넘으면 `None`
    pub fn checked_offset(self, d_row: i32, d_col: i32) -> Option<Self> {
        Some(Self::new(
            self.row.checked_add(d_row)?,
            self.col.checked_add(d_col)?,
        ))
    }

    /// `self`에서 `to`까지의 (d_row, d_col)
    pub fn delta_to(self, to: Square) -> (i32, i32) {
        (to.row - self.row, to.col - self.col)
    }

    /// rows × cols 보드 안인지
    pub fn in_bounds(self, rows: i32, cols: i32) -> bool {
        self.row >= 0 && self.row < rows && self.col >= 0 && self.col < cols
    }

    /// 보드를 180도 돌렸을 때의 좌표
    pub fn rotated(self, rows: i32, cols: i32) -> Self {
        Self::new(rows - 1 - self.row, cols - 1 - self.col)
    }
}

/// 기물 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::King,
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Pawn,
    ];

    /// 레벨 데이터의 기물 번호 (1=킹 … 6=폰)
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(PieceKind::King),
            2 => Some(PieceKind::Queen),
            3 => Some(PieceKind::Rook),
            4 => Some(PieceKind::Bishop),
            5 => Some(PieceKind::Knight),
            6 => Some(PieceKind::Pawn),
            _ => None,
        }
    }

    pub fn id(self) -> i32 {
        self.index() as i32 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::King => "king",
            PieceKind::Queen => "queen",
            PieceKind::Rook => "rook",
            PieceKind::Bishop => "bishop",
            PieceKind::Knight => "knight",
            PieceKind::Pawn => "pawn",
        }
    }

    fn index(self) -> usize {
        match self {
            PieceKind::King => 0,
            PieceKind::Queen => 1,
            PieceKind::Rook => 2,
            PieceKind::Bishop => 3,
            PieceKind::Knight => 4,
            PieceKind::Pawn => 5,
        }
    }

    /// 이 기물의 규칙 테이블 항목
    pub fn rule(self) -> &'static PieceRule {
        &RULES[self.index()]
    }

    /// 모양만 보는 이동 규칙. 경로 막힘은 검사하지 않는다.
    ///
    /// 킹의 제자리 이동(0, 0)도 여기서는 통과한다. 거부는 보드 쪽 책임이다.
    pub fn is_legal_move(self, from: Square, to: Square) -> bool {
        let (d_row, d_col) = from.delta_to(to);
        (self.rule().shape)(d_row, d_col)
    }

    /// `origin`의 기물이 "보는" 칸들을 지연 계산으로 돌려준다.
    ///
    /// 슬라이드 기물(퀸/룩/비숍)은 각 방향으로 나아가다 처음 만난 점유 칸을
    /// 포함하고 멈춘다. 킹과 나이트는 점유와 상관없이 보드 안의 고정
    /// 오프셋을 모두 낸다.
    pub fn attacked_squares<F>(
        self,
        origin: Square,
        rows: i32,
        cols: i32,
        is_occupied: F,
    ) -> AttackedSquares<F>
    where
        F: Fn(Square) -> bool,
    {
        AttackedSquares {
            origin,
            rows,
            cols,
            reach: self.rule().reach,
            is_occupied,
            ray: 0,
            step: 0,
        }
    }
}

/// `PieceKind::is_legal_move`의 자유 함수 형태
pub fn is_legal_move(kind: PieceKind, from: Square, to: Square) -> bool {
    kind.is_legal_move(from, to)
}

/// `PieceKind::attacked_squares`의 자유 함수 형태
pub fn attacked_squares<F>(
    kind: PieceKind,
    origin: Square,
    rows: i32,
    cols: i32,
    is_occupied: F,
) -> AttackedSquares<F>
where
    F: Fn(Square) -> bool,
{
    kind.attacked_squares(origin, rows, cols, is_occupied)
}

/// 공격 범위를 만드는 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    /// 단위 방향으로 막힐 때까지 미끄러진다
    Slide(&'static [(i32, i32)]),
    /// 고정 오프셋으로 한 번에 뛴다
    Leap(&'static [(i32, i32)]),
    /// 공격 규칙 없음
    Nothing,
}

/// 기물 하나의 모양 규칙과 공격 범위
#[derive(Debug, Clone, Copy)]
pub struct PieceRule {
    pub shape: fn(i32, i32) -> bool,
    pub reach: Reach,
}

pub const ROOK_DIRS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

pub const BISHOP_DIRS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub const QUEEN_DIRS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

pub const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

fn king_shape(d_row: i32, d_col: i32) -> bool {
    d_row.abs() <= 1 && d_col.abs() <= 1
}

fn queen_shape(d_row: i32, d_col: i32) -> bool {
    rook_shape(d_row, d_col) || bishop_shape(d_row, d_col)
}

fn rook_shape(d_row: i32, d_col: i32) -> bool {
    d_row == 0 || d_col == 0
}

fn bishop_shape(d_row: i32, d_col: i32) -> bool {
    d_row.abs() == d_col.abs()
}

fn knight_shape(d_row: i32, d_col: i32) -> bool {
    matches!((d_row.abs(), d_col.abs()), (1, 2) | (2, 1))
}

// 폰 규칙은 정의되어 있지 않다
fn pawn_shape(_d_row: i32, _d_col: i32) -> bool {
    false
}

/// `PieceKind` 순서와 같은 순서의 규칙 테이블
static RULES: [PieceRule; 6] = [
    PieceRule {
        shape: king_shape,
        reach: Reach::Leap(&KING_OFFSETS),
    },
    PieceRule {
        shape: queen_shape,
        reach: Reach::Slide(&QUEEN_DIRS),
    },
    PieceRule {
        shape: rook_shape,
        reach: Reach::Slide(&ROOK_DIRS),
    },
    PieceRule {
        shape: bishop_shape,
        reach: Reach::Slide(&BISHOP_DIRS),
    },
    PieceRule {
        shape: knight_shape,
        reach: Reach::Leap(&KNIGHT_OFFSETS),
    },
    PieceRule {
        shape: pawn_shape,
        reach: Reach::Nothing,
    },
];

/// 공격 칸 지연 이터레이터 (`PieceKind::attacked_squares` 참고)
pub struct AttackedSquares<F> {
    origin: Square,
    rows: i32,
    cols: i32,
    reach: Reach,
    is_occupied: F,
    ray: usize,
    step: i32,
}

impl<F> AttackedSquares<F> {
    fn next_ray(&mut self) {
        self.ray += 1;
        self.step = 0;
    }
}

impl<F> Iterator for AttackedSquares<F>
where
    F: Fn(Square) -> bool,
{
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        match self.reach {
            Reach::Nothing => None,
            Reach::Leap(offsets) => {
                while let Some(&(d_row, d_col)) = offsets.get(self.ray) {
                    self.ray += 1;
                    let target = self.origin.offset(d_row, d_col);
                    if target.in_bounds(self.rows, self.cols) {
                        return Some(target);
                    }
                }
                None
            }
            Reach::Slide(dirs) => {
                while let Some(&(d_row, d_col)) = dirs.get(self.ray) {
                    self.step += 1;
                    let target = self.origin.offset(d_row * self.step, d_col * self.step);
                    if !target.in_bounds(self.rows, self.cols) {
                        self.next_ray();
                        continue;
                    }
                    if (self.is_occupied)(target) {
                        // 막힌 칸까지 포함하고 이 방향은 끝
                        trace!(
                            "ray ({}, {}) from ({}, {}) blocked at ({}, {})",
                            d_row, d_col, self.origin.row, self.origin.col, target.row, target.col
                        );
                        self.next_ray();
                    }
                    return Some(target);
                }
                None
            }
        }
    }
}

impl<F> FusedIterator for AttackedSquares<F> where F: Fn(Square) -> bool {}
