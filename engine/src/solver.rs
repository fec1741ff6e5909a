//! 최단 해 탐색.
//!
//! 상대 기물은 움직이지 않고 공격 맵도 바뀌지 않으므로 플레이어 위치 하나가
//! 곧 전체 상태다. 위치 그래프 위에서 BFS를 돈다.

use std::collections::{HashMap, VecDeque};

use rules::Square;

use crate::board::Board;
use crate::command::MoveCommand;
use crate::host::GameHost;

/// 현재 위치에서 목표까지의 최단 수순. 이미 목표 위면 빈 목록, 해가 없으면 `None`.
pub fn shortest_solution<H: GameHost>(board: &Board<H>) -> Option<Vec<MoveCommand>> {
    let start = board.player_position()?;
    let kind = board.player_kind()?;
    if board.is_objective(start) {
        return Some(Vec::new());
    }

    let mut parent: HashMap<Square, Square> = HashMap::new();
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        for next in board.destinations_from(kind, current) {
            if next == start || parent.contains_key(&next) {
                continue;
            }
            parent.insert(next, current);
            if board.is_objective(next) {
                let mut path = vec![next];
                let mut at = next;
                while let Some(&prev) = parent.get(&at) {
                    path.push(prev);
                    at = prev;
                }
                path.reverse();
                return Some(
                    path.windows(2)
                        .map(|w| MoveCommand::between(kind, w[0], w[1]))
                        .collect(),
                );
            }
            queue.push_back(next);
        }
    }

    None
}

pub fn optimal_moves<H: GameHost>(board: &Board<H>) -> Option<usize> {
    shortest_solution(board).map(|path| path.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Side;
    use crate::level::Level;
    use rules::PieceKind;

    #[test]
    fn test_classic_optimal() {
        let level = Level::classic();
        let board = level.to_board().unwrap();
        assert_eq!(optimal_moves(&board), level.optimal_moves);
    }

    #[test]
    fn test_solution_replays_through_move_to() {
        let mut board = Level::classic().to_board().unwrap();
        let solution = shortest_solution(&board).unwrap();

        for cmd in &solution {
            let from = board.player_position().unwrap();
            let target = cmd.target(from);
            assert_eq!(board.move_to(target.row, target.col), Ok(*cmd));
        }
        assert!(board.is_solved());
    }

    #[test]
    fn test_king_distance() {
        let mut board = Board::new(8, 8).unwrap();
        board.set_piece_at(6, 0, PieceKind::King, Side::Player).unwrap();
        board.set_objective(0, 3).unwrap();
        board.generate_capture_map();

        assert_eq!(optimal_moves(&board), Some(6));
    }

    #[test]
    fn test_already_solved_and_unsolvable() {
        let mut board = Board::new(3, 3).unwrap();
        board.set_piece_at(1, 1, PieceKind::Knight, Side::Player).unwrap();
        board.set_objective(0, 0).unwrap();
        board.generate_capture_map();
        // 3x3 가운데 나이트는 갈 곳이 없다
        assert_eq!(shortest_solution(&board), None);

        let mut board = Board::new(2, 2).unwrap();
        board.set_piece_at(0, 0, PieceKind::Rook, Side::Player).unwrap();
        board.set_objective(0, 0).unwrap();
        board.generate_capture_map();
        assert_eq!(shortest_solution(&board), Some(Vec::new()));
    }
}
