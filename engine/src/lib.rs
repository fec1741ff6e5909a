//! 체스 미로 퍼즐 엔진.
//!
//! 플레이어 기물 하나가 상대 기물의 공격 칸을 피해 목표 칸까지 가는 퍼즐.
//! 레벨 로드 때 공격 맵을 한 번 만들고, 이후 이동마다 되돌릴 수 있는
//! `MoveCommand`를 호스트에 넘긴다.

pub mod board;
pub mod command;
pub mod error;
pub mod host;
pub mod level;
pub mod score;
pub mod solver;

// 규칙 크레이트 타입을 공개적으로 재export
pub use rules::{PieceKind, Square};

pub use board::{Board, Cell, Occupant, PuzzleState, Side};
pub use command::MoveCommand;
pub use error::{ConfigurationError, MoveError};
pub use host::{GameHost, NullHost, Pulse, RecordingHost};
pub use level::{Level, OBJECTIVE_ID};
pub use score::{performance, SolutionReport};
