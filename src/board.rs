//! 破阵棋盘
//!
//! 持有 9 × 8 的格子、行棋方、走子历史和棋局状态。状态在每次变动后重新计算。

use crate::layout::parse_layout;
use crate::piece::{Grid, Piece};
use crate::types::{GameStatus, PieceKind, Position, Side};

/// 初始局面：黑方三个卒
const START_PAWNS: [(i8, i8); 3] = [(2, 3), (2, 5), (2, 7)];
/// 初始局面：红车
const START_ROOK: (i8, i8) = (6, 3);

/// 走子记录（只用于悔棋）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Position,
    pub to: Position,
    /// 走子前的棋子快照
    pub moved: Piece,
    /// 被吃棋子的快照
    pub captured: Option<Piece>,
    /// 走这一步时的行棋方
    pub side: Side,
}

/// 棋盘
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    side_to_move: Side,
    history: Vec<MoveRecord>,
    status: GameStatus,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// 初始局面
    pub fn new() -> Self {
        let mut board = Board::empty();
        board.place_start_pieces();
        board.refresh_status();
        board
    }

    /// 空棋盘，红方先走
    pub fn empty() -> Self {
        let mut board = Board {
            grid: Grid::empty(),
            side_to_move: Side::Red,
            history: Vec::new(),
            status: GameStatus::Playing,
        };
        board.refresh_status();
        board
    }

    /// 从布局记号创建棋盘
    pub fn from_layout(layout: &str) -> Result<Board, String> {
        parse_layout(layout)
    }

    /// 重置为初始局面
    pub fn reset(&mut self) {
        self.grid = Grid::empty();
        self.history.clear();
        self.side_to_move = Side::Red;
        self.place_start_pieces();
        self.refresh_status();
    }

    fn place_start_pieces(&mut self) {
        for (row, col) in START_PAWNS {
            let pos = Position::new(row, col);
            self.grid
                .set(pos, Some(Piece::new(PieceKind::Pawn, Side::Black, pos)));
        }
        let pos = Position::new(START_ROOK.0, START_ROOK.1);
        self.grid
            .set(pos, Some(Piece::new(PieceKind::Rook, Side::Red, pos)));
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// 设置行棋方（摆棋用）
    pub fn set_side_to_move(&mut self, side: Side) {
        self.side_to_move = side;
        self.refresh_status();
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    /// 丢弃走子历史，局面不变（之后无法再悔棋）
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// 获取某位置的棋子（越界返回 None）
    pub fn get_piece_at(&self, row: i8, col: i8) -> Option<&Piece> {
        self.grid.get(Position::new(row, col))
    }

    #[inline]
    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.grid.get(pos)
    }

    /// 无条件放置或清除棋子（摆棋操作，不经过走法检查，不记入历史）
    ///
    /// 越界返回 false。
    pub fn set_piece_at(&mut self, row: i8, col: i8, piece: Option<Piece>) -> bool {
        let pos = Position::new(row, col);
        if !pos.is_valid() {
            return false;
        }
        self.grid.set(pos, piece);
        self.check_invariants();
        self.refresh_status();
        true
    }

    /// 移除某位置的棋子（摆棋和消除用，不记入历史）
    pub fn remove_piece_at(&mut self, row: i8, col: i8) -> Option<Piece> {
        let removed = self.grid.take(Position::new(row, col));
        if removed.is_some() {
            self.refresh_status();
        }
        removed
    }

    /// 某一方的所有棋子（行优先顺序）
    pub fn pieces(&self, side: Side) -> Vec<&Piece> {
        self.grid.pieces_of(side).collect()
    }

    /// 找到某一方的将
    pub fn find_king(&self, side: Side) -> Option<Position> {
        self.grid
            .pieces_of(side)
            .find(|p| p.kind == PieceKind::King)
            .map(|p| p.position)
    }

    /// 找到红车
    pub fn find_controlled_rook(&self) -> Option<Position> {
        self.grid
            .pieces_of(Side::Red)
            .find(|p| p.kind == PieceKind::Rook)
            .map(|p| p.position)
    }

    /// 检查走法是否合法（不检查走后自身是否被将军）
    pub fn is_legal_move(&self, piece: &Piece, to: Position) -> bool {
        if !to.is_valid() {
            return false;
        }
        if let Some(target) = self.grid.get(to) {
            if target.side == piece.side {
                return false;
            }
        }
        piece.legal_destinations(&self.grid).contains(&to)
    }

    /// 获取可走位置（用于高亮显示）
    pub fn valid_moves(&self, piece: &Piece) -> Vec<Position> {
        piece
            .legal_destinations(&self.grid)
            .into_iter()
            .filter(|&to| self.is_legal_move(piece, to))
            .collect()
    }

    /// 某一方的全部走法 (from, to)，按格子扫描顺序
    pub fn legal_moves_for(&self, side: Side) -> Vec<(Position, Position)> {
        self.grid
            .pieces_of(side)
            .flat_map(|piece| {
                self.valid_moves(piece)
                    .into_iter()
                    .map(move |to| (piece.position, to))
            })
            .collect()
    }

    /// 某一方是否还有可走的棋
    pub fn has_valid_moves(&self, side: Side) -> bool {
        self.grid
            .pieces_of(side)
            .any(|piece| !self.valid_moves(piece).is_empty())
    }

    /// 检查某一方的将是否被将军（没有将的一方永远不会被将军）
    pub fn is_in_check(&self, side: Side) -> bool {
        let king_pos = match self.find_king(side) {
            Some(pos) => pos,
            None => return false,
        };
        self.grid
            .pieces_of(side.opposite())
            .any(|piece| piece.legal_destinations(&self.grid).contains(&king_pos))
    }

    /// 计算某一方的棋局状态
    pub fn compute_status(&self, side: Side) -> GameStatus {
        let in_check = self.is_in_check(side);
        let has_moves = self.has_valid_moves(side);

        match (in_check, has_moves) {
            (true, false) => GameStatus::Checkmate,
            (true, true) => GameStatus::Check,
            (false, false) => GameStatus::Stalemate,
            (false, true) => GameStatus::Playing,
        }
    }

    fn refresh_status(&mut self) {
        self.status = self.compute_status(self.side_to_move);
    }

    /// 尝试走子，成功返回 true
    ///
    /// 起点无子或走法不合法时返回 false，棋盘不变。
    pub fn attempt_move(&mut self, from: Position, to: Position) -> bool {
        let piece = match self.grid.get(from) {
            Some(p) => *p,
            None => return false,
        };
        if !self.is_legal_move(&piece, to) {
            return false;
        }

        let record = MoveRecord {
            from,
            to,
            moved: piece,
            captured: self.grid.get(to).copied(),
            side: self.side_to_move,
        };

        let mut moving = self.grid.take(from).unwrap_or(piece);
        moving.has_moved = true;
        self.grid.set(to, Some(moving));

        self.history.push(record);
        self.side_to_move = self.side_to_move.opposite();
        self.refresh_status();
        self.check_invariants();

        log::debug!(
            "move {:?} {} -> {}{}",
            piece.kind,
            from,
            to,
            record
                .captured
                .map(|c| format!(" x {:?}", c.kind))
                .unwrap_or_default()
        );
        true
    }

    /// 撤销上一步，历史为空时返回 false
    pub fn undo_last_move(&mut self) -> bool {
        let record = match self.history.pop() {
            Some(r) => r,
            None => return false,
        };

        self.grid.set(record.to, record.captured);
        self.grid.set(record.from, Some(record.moved));
        self.side_to_move = record.side;
        self.refresh_status();
        self.check_invariants();

        log::debug!("undo {} -> {}", record.from, record.to);
        true
    }

    /// 不变量：黑方最多一个将，棋子记录的位置与格子一致
    fn check_invariants(&self) {
        debug_assert!(
            self.grid.king_count(Side::Black) <= 1,
            "more than one black king on the board"
        );
        debug_assert!(
            self.grid.positions_consistent(),
            "piece position disagrees with its cell"
        );
    }
}
