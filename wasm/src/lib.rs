use log::{info, warn, Level as LogLevel, LevelFilter, Log, Metadata, Record};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use engine::{
    solver, Board, ConfigurationError, GameHost, Level, MoveCommand, MoveError, PieceKind, RecordingHost,
    Side, SolutionReport, Square,
};

/// JS에서 사용할 게임 래퍼
#[wasm_bindgen]
pub struct Game {
    board: Board<RecordingHost>,
    level: Level,
    // 레벨 시작 위치 기준 최단 수
    optimal: Option<usize>,
}

/// JS로 전달할 칸 정보
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsCell {
    pub row: i32,
    pub col: i32,
    pub piece: Option<PieceKind>,
    pub side: Option<Side>,
    pub objective: bool,
    pub attackers: usize,
}

/// JS로 전달할 게임 상태
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsGameState {
    pub name: Option<String>,
    pub rows: i32,
    pub cols: i32,
    pub cells: Vec<JsCell>,
    pub player: Option<Square>,
    pub is_solved: bool,
}

/// JS로 전달할 이동 결과
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsMoveResult {
    pub ok: bool,
    pub reason: Option<&'static str>, // "illegal", "attacked", "noPlayer", "outOfBounds"
    pub message: Option<String>,
    pub command: Option<MoveCommand>,
    pub attackers: Vec<Square>,
    pub solved: bool,
}

impl JsMoveResult {
    fn from_outcome(outcome: &Result<MoveCommand, MoveError>, solved: bool) -> Self {
        match outcome {
            Ok(cmd) => JsMoveResult {
                ok: true,
                reason: None,
                message: None,
                command: Some(*cmd),
                attackers: Vec::new(),
                solved,
            },
            Err(err) => {
                let (reason, attackers) = match err {
                    MoveError::IllegalMove { .. } => ("illegal", Vec::new()),
                    MoveError::SquareUnderAttack { attackers, .. } => ("attacked", attackers.clone()),
                    MoveError::NoPlayer => ("noPlayer", Vec::new()),
                    MoveError::OutOfBounds { .. } => ("outOfBounds", Vec::new()),
                };
                JsMoveResult {
                    ok: false,
                    reason: Some(reason),
                    message: Some(err.to_string()),
                    command: None,
                    attackers,
                    solved,
                }
            }
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn config_error(err: ConfigurationError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

impl Game {
    fn from_level(level: Level) -> Result<Game, ConfigurationError> {
        let board = level.build(RecordingHost::new())?;
        info!(
            "loaded level {} ({}x{})",
            level.name.as_deref().unwrap_or("<unnamed>"),
            board.rows(),
            board.cols()
        );
        let optimal = level
            .optimal_moves
            .or_else(|| solver::optimal_moves(&board));
        Ok(Game {
            board,
            level,
            optimal,
        })
    }

    fn build_state(&self) -> JsGameState {
        let cells = self
            .board
            .cells()
            .iter()
            .map(|cell| {
                let square = cell.square();
                JsCell {
                    row: square.row,
                    col: square.col,
                    piece: cell.occupant().kind(),
                    side: cell.occupant().side(),
                    objective: cell.is_objective(),
                    attackers: cell.attacker_count(),
                }
            })
            .collect();

        JsGameState {
            name: self.level.name.clone(),
            rows: self.board.rows(),
            cols: self.board.cols(),
            cells,
            player: self.board.player_position(),
            is_solved: self.board.is_solved(),
        }
    }

    fn build_report(&self) -> SolutionReport {
        SolutionReport::new(
            self.board.is_solved(),
            self.board.host().commands(),
            self.optimal,
        )
    }

    /// 전환 잠금을 걸고 명령을 검사 없이 재생
    fn replay(&mut self, cmd: MoveCommand) -> bool {
        self.board.host_mut().start_transition();
        let outcome = self.board.apply(&cmd);
        self.board.host_mut().end_transition();
        match outcome {
            Ok(_) => true,
            Err(err) => {
                warn!("replay ({}, {}) failed: {}", cmd.d_row(), cmd.d_col(), err);
                false
            }
        }
    }
}

#[wasm_bindgen]
impl Game {
    /// JSON 레벨 설명으로 게임 생성
    #[wasm_bindgen(constructor)]
    pub fn new(descriptor: &str) -> Result<Game, JsValue> {
        let level = Level::from_json(descriptor).map_err(config_error)?;
        Game::from_level(level).map_err(config_error)
    }

    /// 기본 레벨로 게임 생성
    #[wasm_bindgen]
    pub fn classic() -> Result<Game, JsValue> {
        Game::from_level(Level::classic()).map_err(config_error)
    }

    /// 디버그 로그 설정
    #[wasm_bindgen]
    pub fn set_debug(&mut self, enabled: bool) {
        log::set_max_level(if enabled {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        });
    }

    #[wasm_bindgen]
    pub fn rows(&self) -> i32 {
        self.board.rows()
    }

    #[wasm_bindgen]
    pub fn cols(&self) -> i32 {
        self.board.cols()
    }

    /// 현재 게임 상태를 JSON으로 반환
    #[wasm_bindgen]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.build_state())
    }

    #[wasm_bindgen]
    pub fn can_move_to(&self, row: i32, col: i32) -> bool {
        self.board.can_move_to(row, col)
    }

    #[wasm_bindgen]
    pub fn is_capturable(&self, row: i32, col: i32) -> bool {
        self.board.is_capturable(row, col)
    }

    /// 지금 둘 수 있는 칸 목록
    #[wasm_bindgen]
    pub fn legal_destinations(&self) -> Result<JsValue, JsValue> {
        to_js(&self.board.legal_destinations())
    }

    /// 플레이어 기물 이동. 거부되어도 에러가 아니라 결과 객체로 돌려준다.
    #[wasm_bindgen]
    pub fn move_to(&mut self, row: i32, col: i32) -> Result<JsValue, JsValue> {
        self.board.host_mut().start_transition();
        let outcome = self.board.move_to(row, col);
        self.board.host_mut().end_transition();
        to_js(&JsMoveResult::from_outcome(&outcome, self.board.is_solved()))
    }

    /// 마지막 수 되돌리기. 되돌릴 수가 없으면 false.
    #[wasm_bindgen]
    pub fn undo(&mut self) -> bool {
        let Some(cmd) = self.board.host_mut().undo_command() else {
            return false;
        };
        if self.replay(cmd.reverse()) {
            true
        } else {
            self.board.host_mut().redo_command();
            false
        }
    }

    /// 되돌린 수 다시 두기
    #[wasm_bindgen]
    pub fn redo(&mut self) -> bool {
        let Some(cmd) = self.board.host_mut().redo_command() else {
            return false;
        };
        if self.replay(cmd) {
            true
        } else {
            self.board.host_mut().undo_command();
            false
        }
    }

    #[wasm_bindgen]
    pub fn is_solved(&self) -> bool {
        self.board.is_solved()
    }

    /// 쌓인 시각 효과 요청을 꺼낸다
    #[wasm_bindgen]
    pub fn take_pulses(&mut self) -> Result<JsValue, JsValue> {
        let pulses = self.board.host_mut().take_pulses();
        to_js(&pulses)
    }

    /// 확정된 수 목록과 성적
    #[wasm_bindgen]
    pub fn report(&self) -> Result<JsValue, JsValue> {
        to_js(&self.build_report())
    }

    #[wasm_bindgen]
    pub fn optimal_moves(&self) -> Option<usize> {
        self.optimal
    }
}

/// `log` 기록을 브라우저 콘솔로 보낸다
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            LogLevel::Error => web_sys::console::error_1(&line),
            LogLevel::Warn => web_sys::console::warn_1(&line),
            LogLevel::Info => web_sys::console::info_1(&line),
            LogLevel::Debug | LogLevel::Trace => web_sys::console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn init_logging(level: LevelFilter) {
    // 이미 설치되어 있으면 레벨만 바꾼다
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

#[wasm_bindgen(start)]
pub fn main() {
    init_logging(LevelFilter::Info);
    info!("Chess maze WASM initialized!");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_state() {
        let game = Game::from_level(Level::classic()).unwrap();
        let state = game.build_state();

        assert_eq!(state.name.as_deref(), Some("classic"));
        assert_eq!(state.cells.len(), 64);
        assert_eq!(state.player, Some(Square::new(6, 0)));
        assert!(!state.is_solved);

        let player = &state.cells[6 * 8];
        assert_eq!(player.piece, Some(PieceKind::Knight));
        assert_eq!(player.side, Some(Side::Player));
        assert!(state.cells[3].objective);
        assert_eq!(state.cells[4 * 8 + 2].attackers, 2);
    }

    #[test]
    fn test_move_results() {
        let mut game = Game::from_level(Level::classic()).unwrap();

        let attacked = game.board.move_to(5, 2);
        let result = JsMoveResult::from_outcome(&attacked, false);
        assert!(!result.ok);
        assert_eq!(result.reason, Some("attacked"));
        assert_eq!(result.attackers, vec![Square::new(3, 2)]);

        let illegal = game.board.move_to(5, 0);
        assert_eq!(
            JsMoveResult::from_outcome(&illegal, false).reason,
            Some("illegal")
        );

        let ok = game.board.move_to(4, 1);
        let result = JsMoveResult::from_outcome(&ok, game.board.is_solved());
        assert!(result.ok);
        assert_eq!(result.command, Some(MoveCommand::new(PieceKind::Knight, -2, 1)));
        assert!(result.message.is_none());
    }

    #[test]
    fn test_report_uses_level_optimum() {
        let mut game = Game::from_level(Level::classic()).unwrap();
        game.board.move_to(4, 1).unwrap();

        let report = game.build_report();
        assert!(!report.solved);
        assert_eq!(report.moves, 1);
        assert_eq!(report.optimal, Some(21));
        assert_eq!(report.performance, None);
        assert_eq!(report.solution, vec![MoveCommand::new(PieceKind::Knight, -2, 1)]);
    }

    fn king_corridor() -> Game {
        Game::from_level(Level::new(vec![vec![1, 0, 0, 99]])).unwrap()
    }

    #[test]
    fn test_optimal_falls_back_to_solver() {
        let mut game = king_corridor();
        assert_eq!(game.optimal_moves(), Some(3));

        for col in 1..=3 {
            game.board.move_to(0, col).unwrap();
        }
        // 풀고 난 뒤에도 시작 위치 기준 값
        assert_eq!(game.optimal_moves(), Some(3));
        let report = game.build_report();
        assert!(report.solved);
        assert_eq!(report.optimal, Some(3));
        assert_eq!(report.performance, Some(10));
    }

    #[test]
    fn test_undone_moves_leave_the_report() {
        let mut game = king_corridor();
        game.board.move_to(0, 1).unwrap();
        assert!(game.undo());
        assert_eq!(game.board.player_position(), Some(Square::new(0, 0)));
        assert!(!game.undo());

        for col in 1..=3 {
            game.board.move_to(0, col).unwrap();
        }
        let report = game.build_report();
        assert!(report.solved);
        assert_eq!(report.moves, 3);
        assert_eq!(report.performance, Some(10));
        assert_eq!(
            report.solution,
            vec![MoveCommand::new(PieceKind::King, 0, 1); 3]
        );
    }

    #[test]
    fn test_redo_after_undo() {
        let mut game = king_corridor();
        game.board.move_to(0, 1).unwrap();
        game.board.move_to(0, 2).unwrap();

        assert!(game.undo());
        assert!(game.undo());
        assert!(game.redo());
        assert_eq!(game.board.player_position(), Some(Square::new(0, 1)));
        assert_eq!(game.board.host().commands().len(), 1);
        assert_eq!(game.board.host().transitions(), 3);

        // 새 수를 두면 남은 redo는 사라진다
        game.board.move_to(0, 2).unwrap();
        assert!(!game.redo());
        game.board.move_to(0, 3).unwrap();
        assert!(game.is_solved());
        assert_eq!(game.build_report().moves, 3);
    }
}
