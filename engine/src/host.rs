//! 보드를 구동하는 외부 호스트 (명령 기록, 전환 잠금, 시각 효과).

use rules::Square;
use serde::Serialize;

use crate::command::MoveCommand;

/// 보드가 호스트에게 알리는 일들. 기본 구현은 아무것도 하지 않는다.
pub trait GameHost {
    /// `move_to`로 확정된 수. `move_relative` 재생은 여기로 오지 않는다.
    fn add_command(&mut self, _cmd: MoveCommand) {}

    fn start_transition(&mut self) {}

    fn end_transition(&mut self) {}

    /// 규칙상 갈 수 없는 칸을 선택했을 때
    fn pulse_cell(&mut self, _square: Square) {}

    /// 공격받는 칸을 선택했을 때, 그 칸을 노리는 상대 기물들
    fn pulse_attackers(&mut self, _target: Square, _attackers: &[Square]) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl GameHost for NullHost {}

/// 호스트에 요청된 시각 효과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Pulse {
    Cell { square: Square },
    Attackers { target: Square, attackers: Vec<Square> },
}

/// 확정된 수와 시각 효과 요청을 쌓아 두는 호스트.
///
/// `commands`는 되돌린 수를 뺀 현재 수순이고, 되돌린 수는 다시 둘 때까지
/// `redo`에 남는다. 새 수가 확정되면 `redo`는 비워진다.
#[derive(Debug, Default, Clone)]
pub struct RecordingHost {
    commands: Vec<MoveCommand>,
    redo: Vec<MoveCommand>,
    pulses: Vec<Pulse>,
    transitions: usize,
    in_transition: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금 유효한 수순 (순서대로)
    pub fn commands(&self) -> &[MoveCommand] {
        &self.commands
    }

    /// 마지막 수를 수순에서 빼서 redo 쪽으로 옮긴다
    pub fn undo_command(&mut self) -> Option<MoveCommand> {
        let cmd = self.commands.pop()?;
        self.redo.push(cmd);
        Some(cmd)
    }

    /// 마지막으로 되돌린 수를 수순에 다시 넣는다
    pub fn redo_command(&mut self) -> Option<MoveCommand> {
        let cmd = self.redo.pop()?;
        self.commands.push(cmd);
        Some(cmd)
    }

    /// 쌓인 시각 효과 요청을 꺼낸다
    pub fn take_pulses(&mut self) -> Vec<Pulse> {
        std::mem::take(&mut self.pulses)
    }

    /// 끝난 전환 횟수
    pub fn transitions(&self) -> usize {
        self.transitions
    }

}

impl GameHost for RecordingHost {
    fn add_command(&mut self, cmd: MoveCommand) {
        self.commands.push(cmd);
        self.redo.clear();
    }

    fn start_transition(&mut self) {
        self.in_transition = true;
    }

    fn end_transition(&mut self) {
        if self.in_transition {
            self.transitions += 1;
        }
        self.in_transition = false;
    }

    fn pulse_cell(&mut self, square: Square) {
        self.pulses.push(Pulse::Cell { square });
    }

    fn pulse_attackers(&mut self, target: Square, attackers: &[Square]) {
        self.pulses.push(Pulse::Attackers {
            target,
            attackers: attackers.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rules::PieceKind;

    #[test]
    fn test_undo_redo_history() {
        let mut host = RecordingHost::new();
        let a = MoveCommand::new(PieceKind::King, 0, 1);
        let b = MoveCommand::new(PieceKind::King, 1, 0);
        host.add_command(a);
        host.add_command(b);

        assert_eq!(host.undo_command(), Some(b));
        assert_eq!(host.commands(), &[a]);
        assert_eq!(host.redo_command(), Some(b));
        assert_eq!(host.redo_command(), None);
        assert_eq!(host.commands(), &[a, b]);

        // 새 수가 들어오면 redo 기록은 버린다
        host.undo_command();
        host.add_command(a);
        assert_eq!(host.redo_command(), None);
        assert_eq!(host.commands(), &[a, a]);

        host.undo_command();
        host.undo_command();
        assert_eq!(host.undo_command(), None);
        assert!(host.commands().is_empty());
    }

    #[test]
    fn test_transition_counting() {
        let mut host = RecordingHost::new();
        host.end_transition();
        assert_eq!(host.transitions(), 0);
        host.start_transition();
        host.end_transition();
        assert_eq!(host.transitions(), 1);
    }
}
