use log::{debug, info, warn};
use rules::{PieceKind, Square};
use serde::Serialize;

use crate::command::MoveCommand;
use crate::error::{ConfigurationError, MoveError};
use crate::host::{GameHost, NullHost};

/// 기물 진영
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Opponent,
}

/// 칸을 차지한 것
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "side", content = "kind", rename_all = "lowercase")]
pub enum Occupant {
    #[default]
    Empty,
    Player(PieceKind),
    Opponent(PieceKind),
}

impl Occupant {
    pub fn new(kind: PieceKind, side: Side) -> Self {
        match side {
            Side::Player => Occupant::Player(kind),
            Side::Opponent => Occupant::Opponent(kind),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Occupant::Empty)
    }

    pub fn kind(&self) -> Option<PieceKind> {
        match *self {
            Occupant::Empty => None,
            Occupant::Player(kind) | Occupant::Opponent(kind) => Some(kind),
        }
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Occupant::Empty => None,
            Occupant::Player(_) => Some(Side::Player),
            Occupant::Opponent(_) => Some(Side::Opponent),
        }
    }
}

/// 보드의 한 칸
#[derive(Debug, Clone)]
pub struct Cell {
    square: Square,
    occupant: Occupant,
    objective: bool,
    /// 이 칸을 공격하는 상대 기물 칸의 인덱스 (소유하지 않는 역참조)
    attackers: Vec<usize>,
}

impl Cell {
    fn new(square: Square) -> Self {
        Self {
            square,
            occupant: Occupant::Empty,
            objective: false,
            attackers: Vec::new(),
        }
    }

    pub fn square(&self) -> Square {
        self.square
    }

    pub fn occupant(&self) -> Occupant {
        self.occupant
    }

    /// 목표 표시는 점유와 무관하게 유지된다
    pub fn is_objective(&self) -> bool {
        self.objective
    }

    pub fn is_capturable(&self) -> bool {
        !self.attackers.is_empty()
    }

    pub fn attacker_count(&self) -> usize {
        self.attackers.len()
    }
}

/// 퍼즐 진행 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleState {
    Idle,
    Solved,
}

/// 체스 미로 보드: 칸들, 플레이어 위치, 공격 맵
///
/// 배치(`set_piece_at`, `set_objective`)는 `generate_capture_map` 전까지만
/// 허용된다. 이후에는 플레이어 기물만 `move_to` / `move_relative`로 움직인다.
#[derive(Debug)]
pub struct Board<H: GameHost = NullHost> {
    rows: i32,
    cols: i32,
    cells: Vec<Cell>,
    player: Option<Square>,
    capture_map_ready: bool,
    host: H,
}

impl Board<NullHost> {
    pub fn new(rows: i32, cols: i32) -> Result<Self, ConfigurationError> {
        Self::with_host(rows, cols, NullHost)
    }
}

impl<H: GameHost> Board<H> {
    pub fn with_host(rows: i32, cols: i32, host: H) -> Result<Self, ConfigurationError> {
        if rows <= 0 || cols <= 0 {
            return Err(ConfigurationError::InvalidSize { rows, cols });
        }
        let cells = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Cell::new(Square::new(row, col))))
            .collect();
        Ok(Self {
            rows,
            cols,
            cells,
            player: None,
            capture_map_ready: false,
            host,
        })
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn index(&self, square: Square) -> Option<usize> {
        if square.in_bounds(self.rows, self.cols) {
            Some((square.row * self.cols + square.col) as usize)
        } else {
            None
        }
    }

    fn setup_index(&self, row: i32, col: i32) -> Result<usize, ConfigurationError> {
        if self.capture_map_ready {
            return Err(ConfigurationError::CaptureMapLocked);
        }
        self.index(Square::new(row, col))
            .ok_or(ConfigurationError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
    }

    pub fn cell(&self, row: i32, col: i32) -> Option<&Cell> {
        self.index(Square::new(row, col)).map(|idx| &self.cells[idx])
    }

    /// 행 우선 순서의 모든 칸
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn objectives(&self) -> Vec<Square> {
        self.cells
            .iter()
            .filter(|cell| cell.objective)
            .map(|cell| cell.square)
            .collect()
    }

    pub fn is_objective(&self, square: Square) -> bool {
        self.index(square)
            .map(|idx| self.cells[idx].objective)
            .unwrap_or(false)
    }

    fn is_occupied(&self, square: Square) -> bool {
        self.index(square)
            .map(|idx| !self.cells[idx].occupant.is_empty())
            .unwrap_or(false)
    }

    pub fn player_position(&self) -> Option<Square> {
        self.player
    }

    pub fn player_kind(&self) -> Option<PieceKind> {
        let idx = self.index(self.player?)?;
        self.cells[idx].occupant.kind()
    }

    pub fn is_capture_map_ready(&self) -> bool {
        self.capture_map_ready
    }

    /// 레벨 구성용: 기물 배치
    pub fn set_piece_at(
        &mut self,
        row: i32,
        col: i32,
        kind: PieceKind,
        side: Side,
    ) -> Result<(), ConfigurationError> {
        let idx = self.setup_index(row, col)?;
        let square = Square::new(row, col);
        let occupant = Occupant::new(kind, side);
        let cell = &self.cells[idx];

        if cell.occupant == occupant {
            return Ok(());
        }
        if !cell.occupant.is_empty() || (side == Side::Opponent && cell.objective) {
            return Err(ConfigurationError::ConflictingRole { square });
        }
        if side == Side::Player {
            if let Some(existing) = self.player {
                return Err(ConfigurationError::SecondPlayer { existing });
            }
            self.player = Some(square);
        }

        self.cells[idx].occupant = occupant;
        debug!("placed {:?} {} at ({}, {})", side, kind.name(), row, col);
        Ok(())
    }

    /// 레벨 구성용: 목표 칸 지정
    pub fn set_objective(&mut self, row: i32, col: i32) -> Result<(), ConfigurationError> {
        let idx = self.setup_index(row, col)?;
        if let Occupant::Opponent(_) = self.cells[idx].occupant {
            return Err(ConfigurationError::ConflictingRole {
                square: Square::new(row, col),
            });
        }
        self.cells[idx].objective = true;
        Ok(())
    }

    /// 상대 기물마다 공격 칸을 계산해 각 칸에 역참조를 기록한다.
    ///
    /// 기존 역참조를 먼저 비우므로 여러 번 호출해도 결과가 같다.
    /// 호출 이후에는 배치 변경이 잠긴다.
    pub fn generate_capture_map(&mut self) {
        for cell in &mut self.cells {
            cell.attackers.clear();
        }

        let mut links = 0;
        for idx in 0..self.cells.len() {
            let Occupant::Opponent(kind) = self.cells[idx].occupant else {
                continue;
            };
            let origin = self.cells[idx].square;
            let targets: Vec<usize> = kind
                .attacked_squares(origin, self.rows, self.cols, |sq| self.is_occupied(sq))
                .filter_map(|sq| self.index(sq))
                .collect();
            links += targets.len();
            for target in targets {
                self.cells[target].attackers.push(idx);
            }
        }

        self.capture_map_ready = true;
        debug!(
            "capture map generated on {}x{} board: {} attack links",
            self.rows, self.cols, links
        );
    }

    /// 플레이어 기물이 (row, col)로 갈 수 있는 모양인지.
    ///
    /// 경로 막힘은 보지 않는다. 제자리 이동과 보드 밖은 거부한다.
    pub fn can_move_to(&self, row: i32, col: i32) -> bool {
        match (self.player, self.player_kind()) {
            (Some(from), Some(kind)) => self.is_shape_move(kind, from, Square::new(row, col)),
            _ => false,
        }
    }

    fn is_shape_move(&self, kind: PieceKind, from: Square, to: Square) -> bool {
        to != from && to.in_bounds(self.rows, self.cols) && kind.is_legal_move(from, to)
    }

    pub fn is_capturable(&self, row: i32, col: i32) -> bool {
        self.cell(row, col)
            .map(Cell::is_capturable)
            .unwrap_or(false)
    }

    /// (row, col)을 공격하는 상대 기물들의 위치 (행 우선 순서)
    pub fn attackers_of(&self, row: i32, col: i32) -> Vec<Square> {
        self.cell(row, col)
            .map(|cell| {
                cell.attackers
                    .iter()
                    .map(|&idx| self.cells[idx].square)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `kind` 기물이 `from`에서 실제로 둘 수 있는 칸들
    pub fn destinations_from(&self, kind: PieceKind, from: Square) -> Vec<Square> {
        self.cells
            .iter()
            .filter(|cell| !cell.is_capturable() && self.is_shape_move(kind, from, cell.square))
            .map(|cell| cell.square)
            .collect()
    }

    /// 현재 플레이어가 `move_to`로 성공할 수 있는 칸들
    pub fn legal_destinations(&self) -> Vec<Square> {
        match (self.player, self.player_kind()) {
            (Some(from), Some(kind)) => self.destinations_from(kind, from),
            _ => Vec::new(),
        }
    }

    /// 플레이어 기물 이동.
    ///
    /// 모양이 맞지 않으면 `IllegalMove`, 공격받는 칸이면 `SquareUnderAttack`.
    /// 거부될 때는 상태를 바꾸지 않고 호스트에 시각 효과만 요청한다.
    pub fn move_to(&mut self, row: i32, col: i32) -> Result<MoveCommand, MoveError> {
        let from = self.player.ok_or(MoveError::NoPlayer)?;
        let kind = self.player_kind().ok_or(MoveError::NoPlayer)?;
        let to = Square::new(row, col);

        if !self.can_move_to(row, col) {
            warn!(
                "rejected {} move ({}, {}) -> ({}, {}): illegal",
                kind.name(),
                from.row,
                from.col,
                row,
                col
            );
            if to.in_bounds(self.rows, self.cols) {
                self.host.pulse_cell(to);
            }
            return Err(MoveError::IllegalMove { kind, from, to });
        }

        if self.is_capturable(row, col) {
            let attackers = self.attackers_of(row, col);
            warn!(
                "rejected {} move to ({}, {}): attacked by {:?}",
                kind.name(),
                row,
                col,
                attackers
            );
            self.host.pulse_attackers(to, &attackers);
            return Err(MoveError::SquareUnderAttack {
                target: to,
                attackers,
            });
        }

        let cmd = MoveCommand::between(kind, from, to);
        self.relocate_player(from, to);
        self.host.add_command(cmd);

        debug!(
            "{} moved ({}, {}) -> ({}, {})",
            kind.name(),
            from.row,
            from.col,
            to.row,
            to.col
        );
        if self.is_solved() {
            info!("puzzle solved at ({}, {})", to.row, to.col);
        }
        Ok(cmd)
    }

    /// undo/redo 재생용 상대 이동. 규칙과 공격 여부를 다시 검사하지 않는다.
    /// 전환 잠금은 재생하는 쪽이 건다.
    pub fn move_relative(&mut self, d_row: i32, d_col: i32) -> Result<Square, MoveError> {
        let from = self.player.ok_or(MoveError::NoPlayer)?;
        let to = match from.checked_offset(d_row, d_col) {
            Some(to) if self.index(to).is_some() => to,
            _ => {
                return Err(MoveError::OutOfBounds {
                    target: Square::new(
                        from.row.saturating_add(d_row),
                        from.col.saturating_add(d_col),
                    ),
                })
            }
        };

        self.relocate_player(from, to);

        debug!("replayed ({}, {}) -> ({}, {})", from.row, from.col, to.row, to.col);
        Ok(to)
    }

    /// 명령 재생 (`move_relative`와 같음)
    pub fn apply(&mut self, cmd: &MoveCommand) -> Result<Square, MoveError> {
        self.move_relative(cmd.d_row(), cmd.d_col())
    }

    // 잡힌 상대 기물은 되살리지 않는다. 공격 맵도 그대로 둔다.
    fn relocate_player(&mut self, from: Square, to: Square) {
        let (Some(from_idx), Some(to_idx)) = (self.index(from), self.index(to)) else {
            return;
        };
        let occupant = std::mem::take(&mut self.cells[from_idx].occupant);
        let captured = std::mem::replace(&mut self.cells[to_idx].occupant, occupant);
        if let Occupant::Opponent(kind) = captured {
            debug!("captured opponent {} at ({}, {})", kind.name(), to.row, to.col);
        }
        self.player = Some(to);
    }

    /// 플레이어가 목표 칸 위에 있는지
    pub fn is_solved(&self) -> bool {
        self.player
            .map(|square| self.is_objective(square))
            .unwrap_or(false)
    }

    pub fn state(&self) -> PuzzleState {
        if self.is_solved() {
            PuzzleState::Solved
        } else {
            PuzzleState::Idle
        }
    }
}
