use rules::{PieceKind, Square};
use serde::{Deserialize, Serialize};

/// 플레이어 기물의 한 수. 외부 undo/redo 관리자가 보관하고 되돌린다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawMoveCommand")]
pub struct MoveCommand {
    kind: PieceKind,
    d_row: i32,
    d_col: i32,
}

/// JS에서 넘어온 명령. 부호를 뒤집을 수 없는 값은 거부한다.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMoveCommand {
    kind: PieceKind,
    d_row: i32,
    d_col: i32,
}

impl TryFrom<RawMoveCommand> for MoveCommand {
    type Error = String;

    fn try_from(raw: RawMoveCommand) -> Result<Self, Self::Error> {
        if raw.d_row == i32::MIN || raw.d_col == i32::MIN {
            return Err(format!(
                "move delta ({}, {}) is out of range",
                raw.d_row, raw.d_col
            ));
        }
        Ok(Self::new(raw.kind, raw.d_row, raw.d_col))
    }
}

impl MoveCommand {
    pub fn new(kind: PieceKind, d_row: i32, d_col: i32) -> Self {
        Self { kind, d_row, d_col }
    }

    /// `from`에서 `to`로 가는 명령
    pub fn between(kind: PieceKind, from: Square, to: Square) -> Self {
        let (d_row, d_col) = from.delta_to(to);
        Self::new(kind, d_row, d_col)
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn d_row(&self) -> i32 {
        self.d_row
    }

    pub fn d_col(&self) -> i32 {
        self.d_col
    }

    pub fn delta(&self) -> (i32, i32) {
        (self.d_row, self.d_col)
    }

    /// `from`에 적용했을 때의 도착 칸
    pub fn target(&self, from: Square) -> Square {
        from.offset(self.d_row, self.d_col)
    }

    /// 반대 방향 명령 (undo용)
    pub fn reverse(&self) -> Self {
        Self::new(
            self.kind,
            self.d_row.saturating_neg(),
            self.d_col.saturating_neg(),
        )
    }

    pub fn is_opposite(&self, other: &MoveCommand) -> bool {
        self.d_row.checked_add(other.d_row) == Some(0)
            && self.d_col.checked_add(other.d_col) == Some(0)
    }

    pub fn is_identity(&self) -> bool {
        self.d_row == 0 && self.d_col == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_twice_is_original() {
        let cmd = MoveCommand::new(PieceKind::Knight, -2, 1);
        assert_eq!(cmd.reverse().reverse(), cmd);
        assert_eq!(cmd.reverse().delta(), (2, -1));
        assert_eq!(cmd.reverse().kind(), PieceKind::Knight);
    }

    #[test]
    fn test_opposite() {
        let cmd = MoveCommand::new(PieceKind::Rook, 0, 5);
        assert!(cmd.is_opposite(&cmd.reverse()));
        assert!(cmd.reverse().is_opposite(&cmd));
        assert!(!cmd.is_opposite(&cmd));
        // 한 축만 상쇄되면 반대가 아님
        assert!(!cmd.is_opposite(&MoveCommand::new(PieceKind::Rook, 1, -5)));
    }

    #[test]
    fn test_between_and_target() {
        let from = Square::new(6, 0);
        let to = Square::new(4, 1);
        let cmd = MoveCommand::between(PieceKind::Knight, from, to);
        assert_eq!(cmd.delta(), (-2, 1));
        assert_eq!(cmd.target(from), to);
        assert_eq!(cmd.reverse().target(to), from);
        assert!(!cmd.is_identity());
        assert!(MoveCommand::new(PieceKind::King, 0, 0).is_identity());
    }

    #[test]
    fn test_serde_shape() {
        let cmd = MoveCommand::new(PieceKind::Queen, 3, -3);
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"kind":"queen","dRow":3,"dCol":-3}"#);
        let back: MoveCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn test_rejects_unnegatable_delta() {
        let json = r#"{"kind":"rook","dRow":-2147483648,"dCol":0}"#;
        assert!(serde_json::from_str::<MoveCommand>(json).is_err());

        let cmd = MoveCommand::new(PieceKind::Rook, i32::MAX, 0);
        assert_eq!(cmd.reverse().delta(), (-i32::MAX, 0));
        assert!(cmd.is_opposite(&cmd.reverse()));
        assert!(!cmd.is_opposite(&cmd));
    }
}
