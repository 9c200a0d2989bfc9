//! 对局会话
//!
//! 一个会话持有一个棋盘和一个技能状态，UI 通过它完成所有操作。
//! 十字消除分两步：走子后 [`GameSession::elimination_due`] 变为 true，
//! UI 先刷新一次画面，再调用 [`GameSession::execute_pending_elimination`]。

use crate::ability::{sweep, AbilityState, EliminationReport};
use crate::advisor::{AdvisorConfig, MoveAdvisor, Recommendation};
use crate::board::Board;
use crate::layout::to_layout;
use crate::piece::Piece;
use crate::types::{GameStatus, Position, Side};
use serde::Serialize;

/// 每一步的附加记录，悔棋时用来恢复技能状态和被消除的棋子
#[derive(Debug, Clone)]
struct TurnRecord {
    ability_before: AbilityState,
    eliminated: Vec<Piece>,
}

/// 供 UI 绘制的状态快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub layout: String,
    pub side_to_move: String,
    pub status: String,
    pub ability: String,
    pub elimination_due: bool,
    pub moves_played: usize,
}

/// 对局会话
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    ability: AbilityState,
    advisor: MoveAdvisor,
    turns: Vec<TurnRecord>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self::with_config(AdvisorConfig::default())
    }

    pub fn with_config(config: AdvisorConfig) -> Self {
        GameSession {
            board: Board::new(),
            ability: AbilityState::new(),
            advisor: MoveAdvisor::new(config),
            turns: Vec::new(),
        }
    }

    /// 从已有棋盘开始：保留当前局面，丢弃走子历史
    pub fn from_board(mut board: Board, config: AdvisorConfig) -> Self {
        board.clear_history();
        GameSession {
            board,
            ability: AbilityState::new(),
            advisor: MoveAdvisor::new(config),
            turns: Vec::new(),
        }
    }

    /// 新对局：棋盘和技能状态都回到初始
    pub fn new_game(&mut self) {
        self.board.reset();
        self.ability.reset();
        self.turns.clear();
    }

    pub fn reset(&mut self) {
        self.new_game();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn ability(&self) -> &AbilityState {
        &self.ability
    }

    pub fn advisor(&self) -> &MoveAdvisor {
        &self.advisor
    }

    pub fn status(&self) -> GameStatus {
        self.board.status()
    }

    pub fn side_to_move(&self) -> Side {
        self.board.side_to_move()
    }

    pub fn get_piece_at(&self, row: i8, col: i8) -> Option<&Piece> {
        self.board.get_piece_at(row, col)
    }

    /// 摆棋（不经过走法检查）
    pub fn set_piece_at(&mut self, row: i8, col: i8, piece: Option<Piece>) -> bool {
        self.board.set_piece_at(row, col, piece)
    }

    /// 某位置棋子的可走位置，无子时为空
    pub fn valid_moves(&self, from: Position) -> Vec<Position> {
        self.board
            .piece_at(from)
            .map(|piece| self.board.valid_moves(piece))
            .unwrap_or_default()
    }

    /// 走子，成功后推进技能状态
    pub fn attempt_move(&mut self, from: Position, to: Position) -> bool {
        let ability_before = self.ability;
        if !self.board.attempt_move(from, to) {
            return false;
        }

        if let Some(record) = self.board.last_move().copied() {
            self.ability.on_move(&record);
        }

        self.turns.push(TurnRecord {
            ability_before,
            eliminated: Vec::new(),
        });
        true
    }

    /// 是否有消除等待执行
    pub fn elimination_due(&self) -> bool {
        self.ability.elimination_due()
    }

    /// 执行待定的十字消除；没有待定消除时返回 None
    pub fn execute_pending_elimination(&mut self) -> Option<EliminationReport> {
        if !self.ability.elimination_due() {
            return None;
        }

        let origin = match self.board.find_controlled_rook() {
            Some(pos) => pos,
            None => {
                log::warn!("elimination due but the rook is gone, dropping the charge");
                self.ability.complete_elimination(0);
                return None;
            }
        };

        let (removed, kings_removed) = sweep(&mut self.board, origin);
        let chained = self.ability.complete_elimination(kings_removed);

        if let Some(turn) = self.turns.last_mut() {
            turn.eliminated.extend(removed.iter().copied());
        }

        log::debug!(
            "elimination from {} done, chained={}, ability now {}",
            origin,
            chained,
            self.ability.phase().as_str()
        );

        Some(EliminationReport {
            origin,
            removed,
            kings_removed,
            chained,
        })
    }

    /// 悔棋：连同这一步之后的消除一起撤销，技能状态回到这一步之前
    pub fn undo_last_move(&mut self) -> bool {
        if self.board.history().is_empty() {
            return false;
        }

        let turn = self.turns.pop();
        if let Some(turn) = &turn {
            for piece in &turn.eliminated {
                self.board
                    .set_piece_at(piece.position.row, piece.position.col, Some(*piece));
            }
        }

        if !self.board.undo_last_move() {
            return false;
        }
        if let Some(turn) = turn {
            self.ability = turn.ability_before;
        }
        true
    }

    /// 某位置的红车的最佳落点下标（对应 `valid_moves(from)`）
    pub fn recommend(&self, from: Position) -> Option<usize> {
        self.analyze(from).and_then(|rec| rec.best)
    }

    /// 某位置棋子的完整落点评估；无子时返回 None
    pub fn analyze(&self, from: Position) -> Option<Recommendation> {
        let piece = self.board.piece_at(from)?;
        let moves = self.board.valid_moves(piece);
        Some(self.advisor.analyze(&self.board, &self.ability, piece, &moves))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            layout: to_layout(&self.board),
            side_to_move: self.board.side_to_move().to_string(),
            status: self.board.status().as_str().to_string(),
            ability: self.ability.phase().as_str().to_string(),
            elimination_due: self.elimination_due(),
            moves_played: self.board.history().len(),
        }
    }
}
