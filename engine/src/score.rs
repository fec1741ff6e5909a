use serde::Serialize;

use crate::command::MoveCommand;

/// 최적 수 대비 성적 (0~10). `floor(10 * 2·opt / (opt + steps))`
pub fn performance(optimal: usize, steps: usize) -> u32 {
    let total = optimal + steps;
    if total == 0 {
        return 0;
    }
    (20 * optimal / total) as u32
}

/// 풀이 종료 시 호스트에 넘기는 결과. 성적은 풀렸을 때만 매긴다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionReport {
    pub solved: bool,
    pub moves: usize,
    pub optimal: Option<usize>,
    pub performance: Option<u32>,
    pub solution: Vec<MoveCommand>,
}

impl SolutionReport {
    pub fn new(solved: bool, commands: &[MoveCommand], optimal: Option<usize>) -> Self {
        let moves = commands.len();
        Self {
            solved,
            moves,
            optimal,
            performance: optimal
                .filter(|_| solved)
                .map(|opt| performance(opt, moves)),
            solution: commands.to_vec(),
        }
    }
}
