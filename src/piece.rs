//! 棋子与走法规则
//!
//! 走法生成（`legal_destinations`）和攻击判定（`can_attack`）都是对 [`PieceKind`]
//! 的穷尽匹配。攻击判定不复用走法生成，而是直接按规则反向判断，并且可以在
//! “假设某些格子为空”的视图（[`Occupancy`]）上计算，用于安全性评估。

use crate::types::{PieceKind, Position, Side, BOARD_COLS, BOARD_ROWS, ORTHOGONAL};

/// 马的走法：(马腿偏移, [落点偏移; 2])，腿依次为上、下、左、右
const KNIGHT_STEPS: [((i8, i8), [(i8, i8); 2]); 4] = [
    ((-1, 0), [(-2, -1), (-2, 1)]),
    ((1, 0), [(2, -1), (2, 1)]),
    ((0, -1), [(-1, -2), (1, -2)]),
    ((0, 1), [(-1, 2), (1, 2)]),
];

/// 象的走法：(落点偏移, 象眼偏移)
const BISHOP_STEPS: [((i8, i8), (i8, i8)); 4] = [
    ((2, 2), (1, 1)),
    ((2, -2), (1, -1)),
    ((-2, 2), (-1, 1)),
    ((-2, -2), (-1, -1)),
];

const ADVISOR_STEPS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// 将、卒：上、下、左、右一格
const SINGLE_STEPS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    pub position: Position,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, side: Side, position: Position) -> Self {
        Piece {
            kind,
            side,
            position,
            has_moved: false,
        }
    }

    /// 是否为受控的红车
    #[inline]
    pub fn is_controlled_rook(&self) -> bool {
        self.side == Side::Red && self.kind == PieceKind::Rook
    }

    /// 布局记号：红方大写，黑方小写
    pub fn to_notation_char(&self) -> char {
        let c = self.kind.to_notation_char();
        match self.side {
            Side::Red => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    /// 获取所有可到达的目标位置（不考虑自身被将军）
    ///
    /// 输出顺序固定：先按方向，再按距离。最佳落点的平分裁决依赖这个顺序。
    pub fn legal_destinations(&self, grid: &Grid) -> Vec<Position> {
        match self.kind {
            PieceKind::Rook => self.rook_moves(grid),
            PieceKind::Cannon => self.cannon_moves(grid),
            PieceKind::Knight => self.knight_moves(grid),
            PieceKind::Bishop => self.bishop_moves(grid),
            PieceKind::Advisor => self.step_moves(grid, &ADVISOR_STEPS),
            PieceKind::King | PieceKind::Pawn => self.step_moves(grid, &SINGLE_STEPS),
        }
    }

    #[inline]
    fn can_land(&self, grid: &Grid, pos: Position) -> bool {
        if !pos.is_valid() {
            return false;
        }
        match grid.get(pos) {
            None => true,
            Some(target) => target.side != self.side,
        }
    }

    fn rook_moves(&self, grid: &Grid) -> Vec<Position> {
        let mut moves = Vec::with_capacity(15);

        for (dr, dc) in ORTHOGONAL {
            let mut pos = self.position.offset(dr, dc);
            while pos.is_valid() {
                match grid.get(pos) {
                    None => moves.push(pos),
                    Some(target) => {
                        if target.side != self.side {
                            moves.push(pos);
                        }
                        break;
                    }
                }
                pos = pos.offset(dr, dc);
            }
        }

        moves
    }

    fn cannon_moves(&self, grid: &Grid) -> Vec<Position> {
        let mut moves = Vec::with_capacity(15);

        for (dr, dc) in ORTHOGONAL {
            let mut pos = self.position.offset(dr, dc);
            let mut found_screen = false;

            while pos.is_valid() {
                match grid.get(pos) {
                    None => {
                        if !found_screen {
                            moves.push(pos);
                        }
                    }
                    Some(target) => {
                        if !found_screen {
                            found_screen = true;
                        } else {
                            if target.side != self.side {
                                moves.push(pos);
                            }
                            break;
                        }
                    }
                }
                pos = pos.offset(dr, dc);
            }
        }

        moves
    }

    fn knight_moves(&self, grid: &Grid) -> Vec<Position> {
        let mut moves = Vec::with_capacity(8);

        for ((lr, lc), finals) in KNIGHT_STEPS {
            let leg = self.position.offset(lr, lc);
            // 蹩马腿：腿在棋盘外时两个落点也必然越界
            if !leg.is_valid() || grid.get(leg).is_some() {
                continue;
            }
            for (dr, dc) in finals {
                let pos = self.position.offset(dr, dc);
                if self.can_land(grid, pos) {
                    moves.push(pos);
                }
            }
        }

        moves
    }

    fn bishop_moves(&self, grid: &Grid) -> Vec<Position> {
        let mut moves = Vec::with_capacity(4);

        for ((dr, dc), (er, ec)) in BISHOP_STEPS {
            let pos = self.position.offset(dr, dc);
            if !pos.is_valid() {
                continue;
            }
            // 塞象眼
            if grid.get(self.position.offset(er, ec)).is_some() {
                continue;
            }
            if self.can_land(grid, pos) {
                moves.push(pos);
            }
        }

        moves
    }

    fn step_moves(&self, grid: &Grid, steps: &[(i8, i8)]) -> Vec<Position> {
        steps
            .iter()
            .map(|&(dr, dc)| self.position.offset(dr, dc))
            .filter(|&pos| self.can_land(grid, pos))
            .collect()
    }
}

/// 9 × 8 的棋盘格子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    cells: [[Option<Piece>; BOARD_COLS as usize]; BOARD_ROWS as usize],
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    pub fn empty() -> Self {
        Grid {
            cells: [[None; BOARD_COLS as usize]; BOARD_ROWS as usize],
        }
    }

    /// 获取某位置的棋子（越界返回 None）
    #[inline]
    pub fn get(&self, pos: Position) -> Option<&Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.cells[pos.row as usize][pos.col as usize].as_ref()
    }

    /// 放置或清除棋子；放置时同步棋子记录的位置。越界时什么都不做。
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        if !pos.is_valid() {
            return;
        }
        self.cells[pos.row as usize][pos.col as usize] = piece.map(|mut p| {
            p.position = pos;
            p
        });
    }

    /// 取出某位置的棋子，原位置清空
    pub fn take(&mut self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.cells[pos.row as usize][pos.col as usize].take()
    }

    /// 按行优先顺序遍历所有棋子
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter().flatten().filter_map(|cell| cell.as_ref())
    }

    /// 某一方的所有棋子（行优先顺序）
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |p| p.side == side)
    }

    /// 检查每个棋子记录的位置与所在格子一致
    pub fn positions_consistent(&self) -> bool {
        self.cells.iter().enumerate().all(|(row, cells)| {
            cells.iter().enumerate().all(|(col, cell)| {
                cell.map_or(true, |p| p.position == Position::new(row as i8, col as i8))
            })
        })
    }

    /// 黑方将的数量
    pub fn king_count(&self, side: Side) -> usize {
        self.pieces_of(side)
            .filter(|p| p.kind == PieceKind::King)
            .count()
    }
}

/// 假设视图：在真实棋盘上把若干格子当作空的
///
/// 安全性评估用它代替“临时移走再放回”，棋盘本身从不处于中间状态。
#[derive(Debug, Clone, Copy)]
pub struct Occupancy<'a> {
    grid: &'a Grid,
    vacated: &'a [Position],
}

impl<'a> Occupancy<'a> {
    pub fn new(grid: &'a Grid, vacated: &'a [Position]) -> Self {
        Occupancy { grid, vacated }
    }

    /// 真实棋盘视图
    pub fn actual(grid: &'a Grid) -> Self {
        Occupancy { grid, vacated: &[] }
    }

    #[inline]
    pub fn piece_at(&self, pos: Position) -> Option<&'a Piece> {
        if self.vacated.contains(&pos) {
            return None;
        }
        self.grid.get(pos)
    }

    #[inline]
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.piece_at(pos).is_some()
    }

    /// 视图中仍然存在的棋子
    pub fn pieces(&self) -> impl Iterator<Item = &'a Piece> + 'a {
        let grid: &'a Grid = self.grid;
        let vacated = self.vacated;
        grid.pieces().filter(move |p| !vacated.contains(&p.position))
    }

    /// 两点在同一直线上时，返回严格位于两者之间的棋子数
    fn count_between(&self, from: Position, to: Position) -> Option<usize> {
        if from == to || (from.row != to.row && from.col != to.col) {
            return None;
        }
        let dr = (to.row - from.row).signum();
        let dc = (to.col - from.col).signum();
        let mut count = 0;
        let mut pos = from.offset(dr, dc);
        while pos != to {
            if self.is_occupied(pos) {
                count += 1;
            }
            pos = pos.offset(dr, dc);
        }
        Some(count)
    }
}

/// 攻击判定：`attacker` 从其所在格能否一步走到 `target`
///
/// 只看路径，不看 `target` 上是谁（保护判断需要对己方棋子所在格求值）。
pub fn can_attack(attacker: &Piece, target: Position, occupancy: &Occupancy<'_>) -> bool {
    let from = attacker.position;
    if from == target || !target.is_valid() {
        return false;
    }
    let dr = target.row - from.row;
    let dc = target.col - from.col;

    match attacker.kind {
        PieceKind::Rook => occupancy.count_between(from, target) == Some(0),
        PieceKind::Cannon => occupancy.count_between(from, target) == Some(1),
        PieceKind::Knight => {
            let leg = match (dr.abs(), dc.abs()) {
                (2, 1) => from.offset(dr.signum(), 0),
                (1, 2) => from.offset(0, dc.signum()),
                _ => return false,
            };
            !occupancy.is_occupied(leg)
        }
        PieceKind::Bishop => {
            if dr.abs() != 2 || dc.abs() != 2 {
                return false;
            }
            !occupancy.is_occupied(from.offset(dr / 2, dc / 2))
        }
        PieceKind::Advisor => dr.abs() == 1 && dc.abs() == 1,
        PieceKind::King | PieceKind::Pawn => dr.abs() + dc.abs() == 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(grid: &mut Grid, kind: PieceKind, side: Side, row: i8, col: i8) -> Piece {
        let piece = Piece::new(kind, side, Position::new(row, col));
        grid.set(piece.position, Some(piece));
        piece
    }

    #[test]
    fn test_rook_slides_and_stops() {
        let mut grid = Grid::empty();
        let rook = place(&mut grid, PieceKind::Rook, Side::Red, 6, 3);
        place(&mut grid, PieceKind::Pawn, Side::Black, 2, 3);

        let moves = rook.legal_destinations(&grid);
        // 右 4 + 左 3 + 下 2 + 上 4（含吃卒）
        assert_eq!(moves.len(), 13);
        assert!(moves.contains(&Position::new(2, 3)));
        assert!(!moves.contains(&Position::new(1, 3)));
        // 方向顺序：右、左、下、上
        assert_eq!(moves[0], Position::new(6, 4));
        assert_eq!(moves[4], Position::new(6, 2));
        assert_eq!(moves[7], Position::new(7, 3));
        assert_eq!(moves[9], Position::new(5, 3));
    }

    #[test]
    fn test_cannon_needs_screen() {
        let mut grid = Grid::empty();
        let cannon = place(&mut grid, PieceKind::Cannon, Side::Black, 4, 0);
        place(&mut grid, PieceKind::Pawn, Side::Black, 4, 3);
        place(&mut grid, PieceKind::Rook, Side::Red, 4, 6);

        let moves = cannon.legal_destinations(&grid);
        assert!(moves.contains(&Position::new(4, 1)));
        assert!(moves.contains(&Position::new(4, 2)));
        assert!(!moves.contains(&Position::new(4, 3)), "炮架不能落子");
        assert!(!moves.contains(&Position::new(4, 4)));
        assert!(!moves.contains(&Position::new(4, 5)));
        assert!(moves.contains(&Position::new(4, 6)), "隔一子吃车");
    }

    #[test]
    fn test_cannon_cannot_capture_own_side_beyond_screen() {
        let mut grid = Grid::empty();
        let cannon = place(&mut grid, PieceKind::Cannon, Side::Black, 0, 0);
        place(&mut grid, PieceKind::Pawn, Side::Red, 0, 2);
        place(&mut grid, PieceKind::Pawn, Side::Black, 0, 5);

        let moves = cannon.legal_destinations(&grid);
        assert!(!moves.contains(&Position::new(0, 5)));
        assert!(!moves.contains(&Position::new(0, 6)));
    }

    #[test]
    fn test_knight_leg_blocking() {
        let mut grid = Grid::empty();
        let knight = place(&mut grid, PieceKind::Knight, Side::Black, 4, 4);
        let free = knight.legal_destinations(&grid);
        assert_eq!(free.len(), 8);

        // 上方马腿被塞，只影响两个向上的落点
        place(&mut grid, PieceKind::Pawn, Side::Black, 3, 4);
        let blocked = knight.legal_destinations(&grid);
        assert_eq!(blocked.len(), 6);
        assert!(!blocked.contains(&Position::new(2, 3)));
        assert!(!blocked.contains(&Position::new(2, 5)));
        assert!(blocked.contains(&Position::new(3, 6)));
        assert!(blocked.contains(&Position::new(3, 2)));
    }

    #[test]
    fn test_bishop_eye_blocking() {
        let mut grid = Grid::empty();
        let bishop = place(&mut grid, PieceKind::Bishop, Side::Black, 4, 4);
        assert_eq!(bishop.legal_destinations(&grid).len(), 4);

        place(&mut grid, PieceKind::Rook, Side::Red, 5, 5);
        let moves = bishop.legal_destinations(&grid);
        assert_eq!(moves.len(), 3);
        assert!(!moves.contains(&Position::new(6, 6)));
    }

    #[test]
    fn test_short_steppers() {
        let mut grid = Grid::empty();
        let advisor = place(&mut grid, PieceKind::Advisor, Side::Black, 0, 0);
        assert_eq!(advisor.legal_destinations(&grid), vec![Position::new(1, 1)]);

        let pawn = place(&mut grid, PieceKind::Pawn, Side::Black, 4, 4);
        // 卒可以四个方向走，包括后退
        assert_eq!(
            pawn.legal_destinations(&grid),
            vec![
                Position::new(3, 4),
                Position::new(5, 4),
                Position::new(4, 3),
                Position::new(4, 5)
            ]
        );

        let king = place(&mut grid, PieceKind::King, Side::Black, 8, 7);
        assert_eq!(
            king.legal_destinations(&grid),
            vec![Position::new(7, 7), Position::new(8, 6)]
        );
    }

    #[test]
    fn test_destinations_never_hit_own_side() {
        let mut grid = Grid::empty();
        let knight = place(&mut grid, PieceKind::Knight, Side::Black, 4, 4);
        place(&mut grid, PieceKind::Pawn, Side::Black, 2, 3);
        place(&mut grid, PieceKind::Rook, Side::Red, 2, 5);

        let moves = knight.legal_destinations(&grid);
        assert!(!moves.contains(&Position::new(2, 3)));
        assert!(moves.contains(&Position::new(2, 5)));
        for pos in moves {
            assert!(pos.is_valid());
            assert!(grid.get(pos).map_or(true, |p| p.side != Side::Black));
        }
    }

    #[test]
    fn test_attack_matches_move_generation() {
        let mut grid = Grid::empty();
        let target = place(&mut grid, PieceKind::Rook, Side::Red, 4, 3);
        let attackers = [
            place(&mut grid, PieceKind::Cannon, Side::Black, 4, 6),
            place(&mut grid, PieceKind::Knight, Side::Black, 2, 2),
            place(&mut grid, PieceKind::Bishop, Side::Black, 6, 5),
            place(&mut grid, PieceKind::Advisor, Side::Black, 3, 4),
            place(&mut grid, PieceKind::Pawn, Side::Black, 5, 3),
            place(&mut grid, PieceKind::Rook, Side::Black, 4, 0),
        ];
        place(&mut grid, PieceKind::Pawn, Side::Black, 4, 5);

        let occupancy = Occupancy::actual(&grid);
        for attacker in &attackers {
            let by_moves = attacker.legal_destinations(&grid).contains(&target.position);
            let by_predicate = can_attack(attacker, target.position, &occupancy);
            assert_eq!(by_moves, by_predicate, "{:?}", attacker.kind);
        }
    }

    #[test]
    fn test_attack_with_vacated_square() {
        let mut grid = Grid::empty();
        let rook = place(&mut grid, PieceKind::Rook, Side::Black, 0, 3);
        place(&mut grid, PieceKind::Rook, Side::Red, 3, 3);

        let target = Position::new(5, 3);
        assert!(!can_attack(&rook, target, &Occupancy::actual(&grid)));
        let vacated = [Position::new(3, 3)];
        assert!(can_attack(&rook, target, &Occupancy::new(&grid, &vacated)));
    }

    #[test]
    fn test_grid_set_syncs_position() {
        let mut grid = Grid::empty();
        let piece = Piece::new(PieceKind::King, Side::Black, Position::new(0, 0));
        grid.set(Position::new(3, 3), Some(piece));
        assert_eq!(grid.get(Position::new(3, 3)).map(|p| p.position), Some(Position::new(3, 3)));
        assert!(grid.positions_consistent());
        assert_eq!(grid.king_count(Side::Black), 1);
    }
}
