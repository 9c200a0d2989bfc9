//! 十字消除技能
//!
//! 红车吃掉黑将后获得一次充能；充能状态下红车再走一步即触发消除，
//! 移除车所在行列上的全部黑子（不受阻挡）。若消除中又除掉了将，则重新充能。
//!
//! ```text
//! Idle ──吃将──▶ Charged ──车再走一步──▶ Armed ──执行消除──▶ Idle / Charged
//! ```

use crate::board::{Board, MoveRecord};
use crate::piece::{Grid, Piece};
use crate::types::{PieceKind, Position, Side, ORTHOGONAL};

/// 技能阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityPhase {
    /// 未充能
    Idle,
    /// 已充能，等待下一次车的走子
    Charged,
    /// 已充能且下一次消除待执行
    Armed,
}

impl AbilityPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbilityPhase::Idle => "idle",
            AbilityPhase::Charged => "charged",
            AbilityPhase::Armed => "armed",
        }
    }
}

/// 技能状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AbilityState {
    pub charged: bool,
    pub pending_trigger: bool,
    /// 触发消除的那一步本身吃掉了将（计入连锁充能）
    pub arming_captured_king: bool,
}

impl AbilityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已充能、尚未触发的状态
    pub fn charged() -> Self {
        AbilityState {
            charged: true,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> AbilityPhase {
        match (self.charged, self.pending_trigger) {
            (false, _) => AbilityPhase::Idle,
            (true, false) => AbilityPhase::Charged,
            (true, true) => AbilityPhase::Armed,
        }
    }

    /// 充能是否有效（Charged 或 Armed）
    #[inline]
    pub fn is_charged(&self) -> bool {
        self.charged
    }

    /// 是否有消除待执行
    #[inline]
    pub fn elimination_due(&self) -> bool {
        self.charged && self.pending_trigger
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 响应一次已经执行的走子，返回新的阶段
    ///
    /// 只有红车的走子会改变状态。吃将的那一步只充能，不触发消除。
    pub fn on_move(&mut self, record: &MoveRecord) -> AbilityPhase {
        if !record.moved.is_controlled_rook() {
            return self.phase();
        }

        let took_king = record
            .captured
            .map_or(false, |c| c.side == Side::Black && c.kind == PieceKind::King);

        match self.phase() {
            AbilityPhase::Idle => {
                if took_king {
                    self.charged = true;
                    log::debug!("ability charged at {}", record.to);
                }
            }
            AbilityPhase::Charged => {
                self.pending_trigger = true;
                self.arming_captured_king = took_king;
                log::debug!("ability armed at {}", record.to);
            }
            AbilityPhase::Armed => {}
        }
        self.phase()
    }

    /// 消除执行完毕：消除中除掉了将，或触发的那一步吃了将，则重新充能，否则回到 Idle。
    /// 返回是否连锁充能。
    pub fn complete_elimination(&mut self, kings_removed: usize) -> bool {
        debug_assert!(self.elimination_due(), "elimination completed while not armed");
        let chained = kings_removed > 0 || self.arming_captured_king;
        *self = AbilityState {
            charged: chained,
            ..Self::default()
        };
        chained
    }
}

/// 一次十字消除的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EliminationReport {
    pub origin: Position,
    pub removed: Vec<Piece>,
    pub kings_removed: usize,
    pub chained: bool,
}

/// 十字线上所有黑子的位置（穿透，不受阻挡）
///
/// 方向顺序：右、左、下、上；每个方向由近到远。
pub fn cross_targets(grid: &Grid, origin: Position) -> Vec<Position> {
    let mut targets = Vec::new();
    for (dr, dc) in ORTHOGONAL {
        let mut pos = origin.offset(dr, dc);
        while pos.is_valid() {
            if grid.get(pos).map_or(false, |p| p.side == Side::Black) {
                targets.push(pos);
            }
            pos = pos.offset(dr, dc);
        }
    }
    targets
}

/// 从 `origin` 执行十字消除，移除车所在行列上的全部黑子
///
/// 只负责清除棋子并统计被除掉的将；状态机的推进由调用方完成。
pub fn sweep(board: &mut Board, origin: Position) -> (Vec<Piece>, usize) {
    let mut removed = Vec::new();
    for pos in cross_targets(board.grid(), origin) {
        if let Some(piece) = board.remove_piece_at(pos.row, pos.col) {
            removed.push(piece);
        }
    }
    let kings = removed.iter().filter(|p| p.kind == PieceKind::King).count();
    log::debug!(
        "cross elimination at {} removed {} piece(s), {} king(s)",
        origin,
        removed.len(),
        kings
    );
    (removed, kings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: i8, col: i8) -> Position {
        Position::new(row, col)
    }

    fn rook_record(from: Position, to: Position, captured: Option<Piece>) -> MoveRecord {
        MoveRecord {
            from,
            to,
            moved: Piece::new(PieceKind::Rook, Side::Red, from),
            captured,
            side: Side::Red,
        }
    }

    #[test]
    fn test_charge_on_king_capture_only() {
        let mut state = AbilityState::new();
        let pawn = Piece::new(PieceKind::Pawn, Side::Black, pos(2, 3));
        assert_eq!(state.on_move(&rook_record(pos(6, 3), pos(2, 3), Some(pawn))), AbilityPhase::Idle);

        let king = Piece::new(PieceKind::King, Side::Black, pos(0, 3));
        assert_eq!(state.on_move(&rook_record(pos(2, 3), pos(0, 3), Some(king))), AbilityPhase::Charged);
        assert!(state.is_charged());
        assert!(!state.elimination_due(), "吃将那一步本身不触发消除");
    }

    #[test]
    fn test_next_rook_move_arms() {
        let mut state = AbilityState::charged();
        // 黑方走子不影响
        let black_move = MoveRecord {
            from: pos(1, 1),
            to: pos(1, 2),
            moved: Piece::new(PieceKind::Pawn, Side::Black, pos(1, 1)),
            captured: None,
            side: Side::Black,
        };
        assert_eq!(state.on_move(&black_move), AbilityPhase::Charged);

        assert_eq!(state.on_move(&rook_record(pos(0, 3), pos(4, 3), None)), AbilityPhase::Armed);
        assert!(state.elimination_due());
    }

    #[test]
    fn test_complete_elimination_transitions() {
        let armed = AbilityState {
            charged: true,
            pending_trigger: true,
            arming_captured_king: false,
        };

        let mut state = armed;
        assert!(!state.complete_elimination(0));
        assert_eq!(state.phase(), AbilityPhase::Idle);

        let mut state = armed;
        assert!(state.complete_elimination(1));
        assert_eq!(state.phase(), AbilityPhase::Charged);
    }

    #[test]
    fn test_king_taken_by_arming_move_chains() {
        let mut state = AbilityState::charged();
        let king = Piece::new(PieceKind::King, Side::Black, pos(4, 3));
        assert_eq!(state.on_move(&rook_record(pos(0, 3), pos(4, 3), Some(king))), AbilityPhase::Armed);
        assert!(state.arming_captured_king);

        // 十字线上没有将，仍然连锁充能
        assert!(state.complete_elimination(0));
        assert_eq!(state.phase(), AbilityPhase::Charged);
        assert!(!state.arming_captured_king, "标记随消除清除");
    }

    #[test]
    fn test_sweep_passes_through_blockers() {
        let mut board = Board::empty();
        board.set_piece_at(4, 3, Some(Piece::new(PieceKind::Rook, Side::Red, pos(4, 3))));
        let black = [
            (PieceKind::Pawn, 4, 5),
            (PieceKind::Cannon, 4, 7),
            (PieceKind::Knight, 4, 0),
            (PieceKind::King, 0, 3),
            (PieceKind::Advisor, 2, 3),
            (PieceKind::Bishop, 8, 3),
            (PieceKind::Pawn, 5, 4),
        ];
        for (kind, row, col) in black {
            board.set_piece_at(row, col, Some(Piece::new(kind, Side::Black, pos(row, col))));
        }

        assert_eq!(
            cross_targets(board.grid(), pos(4, 3)),
            vec![pos(4, 5), pos(4, 7), pos(4, 0), pos(8, 3), pos(2, 3), pos(0, 3)]
        );

        let (removed, kings) = sweep(&mut board, pos(4, 3));
        assert_eq!(removed.len(), 6);
        assert_eq!(kings, 1);
        assert_eq!(board.pieces(Side::Black).len(), 1, "斜线上的卒不受影响");
        assert!(board.get_piece_at(5, 4).is_some());
        assert!(board.get_piece_at(4, 3).is_some(), "车本身保留");
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(AbilityState::new().phase().as_str(), "idle");
        assert_eq!(AbilityPhase::Armed.as_str(), "armed");
    }
}
