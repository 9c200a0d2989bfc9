//! 随机对手
//!
//! 替黑方随机挑一个合法走法，用于命令行自动对弈。

use crate::board::Board;
use crate::types::{Position, Side};
use rand::prelude::*;

/// 随机对手，只替黑方走子
pub struct RandomOpponent {
    rng: StdRng,
}

impl RandomOpponent {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        RandomOpponent { rng }
    }

    /// 随机选一步黑方走法；黑方无子可走时返回 None
    pub fn pick_move(&mut self, board: &Board) -> Option<(Position, Position)> {
        let moves = board.legal_moves_for(Side::Black);
        let choice = moves.choose(&mut self.rng).copied();
        if let Some((from, to)) = choice {
            log::debug!("opponent picks {} -> {} of {} moves", from, to, moves.len());
        }
        choice
    }
}
