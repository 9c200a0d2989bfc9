//! 破阵核心类型定义
//!
//! 棋盘为 9 行 × 8 列；红方只有一个车，黑方由玩家手动摆放。

use serde::Serialize;
use std::fmt;

/// 棋盘行数
pub const BOARD_ROWS: i8 = 9;
/// 棋盘列数
pub const BOARD_COLS: i8 = 8;

/// 阵营
///
/// `Red` 是受控方（只有一个车），`Black` 是对手（完整兵力，唯一的将）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Red,
    Black,
}

impl Side {
    /// 获取对方阵营
    pub fn opposite(&self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// 从布局记号解析（`r` / `b`）
    pub fn from_notation_char(c: char) -> Option<Side> {
        match c {
            'r' => Some(Side::Red),
            'b' => Some(Side::Black),
            _ => None,
        }
    }

    pub fn to_notation_char(&self) -> char {
        match self {
            Side::Red => 'r',
            Side::Black => 'b',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => write!(f, "Red"),
            Side::Black => write!(f, "Black"),
        }
    }
}

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    /// 将
    King,
    /// 车
    Rook,
    /// 象
    Bishop,
    /// 马
    Knight,
    /// 卒
    Pawn,
    /// 士
    Advisor,
    /// 炮
    Cannon,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::King,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Pawn,
        PieceKind::Advisor,
        PieceKind::Cannon,
    ];

    /// 从布局记号解析（大小写不敏感）
    pub fn from_notation_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'k' => Some(PieceKind::King),
            'r' => Some(PieceKind::Rook),
            'b' => Some(PieceKind::Bishop),
            'n' => Some(PieceKind::Knight),
            'p' => Some(PieceKind::Pawn),
            'a' => Some(PieceKind::Advisor),
            'c' => Some(PieceKind::Cannon),
            _ => None,
        }
    }

    /// 转换为布局记号（小写）
    pub fn to_notation_char(&self) -> char {
        match self {
            PieceKind::King => 'k',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Pawn => 'p',
            PieceKind::Advisor => 'a',
            PieceKind::Cannon => 'c',
        }
    }

    /// 棋子基础价值（最佳落点评估用）
    pub fn base_value(&self) -> i32 {
        match self {
            PieceKind::Pawn => 8,
            PieceKind::Advisor => 8,
            PieceKind::Bishop => 15,
            PieceKind::Cannon => 20,
            PieceKind::Knight => 20,
            PieceKind::Rook => 30,
            PieceKind::King => 100,
        }
    }

    /// 吃掉后享受额外加成的高价值目标
    pub fn is_priority_target(&self) -> bool {
        matches!(self, PieceKind::Cannon | PieceKind::Rook | PieceKind::King)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::King => "King",
            PieceKind::Rook => "Rook",
            PieceKind::Bishop => "Bishop",
            PieceKind::Knight => "Knight",
            PieceKind::Pawn => "Pawn",
            PieceKind::Advisor => "Advisor",
            PieceKind::Cannon => "Cannon",
        };
        write!(f, "{}", name)
    }
}

/// 棋盘位置 (row, col)
///
/// row: 0-8（从上到下）
/// col: 0-7（从左到右）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// 检查位置是否在棋盘范围内
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..BOARD_ROWS).contains(&self.row) && (0..BOARD_COLS).contains(&self.col)
    }

    /// 位置加偏移量（结果可能越界，由调用方检查）
    #[inline]
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Position {
        Position {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// 是否为四个角之一
    pub fn is_corner(&self) -> bool {
        (self.row == 0 || self.row == BOARD_ROWS - 1) && (self.col == 0 || self.col == BOARD_COLS - 1)
    }

    /// 从坐标记号解析（如 "d6"：列 d，行 6）
    pub fn from_notation(s: &str) -> Option<Position> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let col = match bytes[0] {
            b'a'..=b'h' => (bytes[0] - b'a') as i8,
            _ => return None,
        };
        let row = match bytes[1] {
            b'0'..=b'8' => (bytes[1] - b'0') as i8,
            _ => return None,
        };
        Some(Position { row, col })
    }

    /// 转换为坐标记号；棋盘外的位置写成 `(row,col)`
    pub fn to_notation(&self) -> String {
        if !self.is_valid() {
            return format!("({},{})", self.row, self.col);
        }
        let col_char = (b'a' + self.col as u8) as char;
        format!("{}{}", col_char, self.row)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_notation())
    }
}

/// 四个正交方向：右、左、下、上
pub const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// 棋局状态
///
/// 永远由当前棋盘与行棋方重新计算，不单独设置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
        }
    }

    /// 对局是否已经结束
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(0, 0).is_valid());
        assert!(Position::new(8, 7).is_valid());
        assert!(!Position::new(9, 0).is_valid());
        assert!(!Position::new(0, 8).is_valid());
        assert!(!Position::new(-1, 3).is_valid());
    }

    #[test]
    fn test_position_notation() {
        assert_eq!(Position::from_notation("a0"), Some(Position::new(0, 0)));
        assert_eq!(Position::from_notation("d6"), Some(Position::new(6, 3)));
        assert_eq!(Position::from_notation("h8"), Some(Position::new(8, 7)));
        assert_eq!(Position::from_notation("i0"), None);
        assert_eq!(Position::from_notation("a9"), None);
        assert_eq!(Position::new(2, 5).to_notation(), "f2");
    }

    #[test]
    fn test_off_board_notation() {
        assert_eq!(Position::new(-1, 2).to_string(), "(-1,2)");
        assert_eq!(Position::new(3, -1).to_notation(), "(3,-1)");
        assert_eq!(Position::new(0, 8).to_notation(), "(0,8)");
        assert_eq!(Position::new(9, 0).to_string(), "(9,0)");
    }

    #[test]
    fn test_corners() {
        assert!(Position::new(0, 0).is_corner());
        assert!(Position::new(8, 7).is_corner());
        assert!(Position::new(0, 7).is_corner());
        assert!(!Position::new(0, 3).is_corner());
    }

    #[test]
    fn test_piece_kind_chars() {
        for kind in PieceKind::ALL {
            let c = kind.to_notation_char();
            assert_eq!(PieceKind::from_notation_char(c), Some(kind));
            assert_eq!(PieceKind::from_notation_char(c.to_ascii_uppercase()), Some(kind));
        }
        assert_eq!(PieceKind::from_notation_char('x'), None);
    }

    #[test]
    fn test_base_values() {
        assert_eq!(PieceKind::Pawn.base_value(), 8);
        assert_eq!(PieceKind::Bishop.base_value(), 15);
        assert_eq!(PieceKind::Knight.base_value(), PieceKind::Cannon.base_value());
        assert_eq!(PieceKind::King.base_value(), 100);
        assert!(PieceKind::Cannon.is_priority_target());
        assert!(!PieceKind::Knight.is_priority_target());
    }
}
