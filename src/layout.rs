//! 布局记号解析和生成
//!
//! 格式: `<棋盘> <行棋方>`
//!
//! 棋盘从第 0 行写到第 8 行，行之间用 `/` 分隔，每行 8 列：
//! - 红方：大写 K R B N P A C
//! - 黑方：小写 k r b n p a c
//! - 空格：数字 (1-8)
//!
//! 行棋方：`r` 或 `b`。
//!
//! 初始局面: `8/8/3p1p1p/8/8/8/3R4/8/8 r`

use crate::board::Board;
use crate::piece::Piece;
use crate::types::{PieceKind, Position, Side, BOARD_COLS, BOARD_ROWS};

/// 解析布局记号为棋盘
pub fn parse_layout(layout: &str) -> Result<Board, String> {
    let parts: Vec<&str> = layout.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid layout: expected '<board> <side>', got: {}",
            layout
        ));
    }

    let pieces = parse_rows(parts[0])?;
    let side = parts[1]
        .chars()
        .next()
        .and_then(Side::from_notation_char)
        .filter(|_| parts[1].len() == 1)
        .ok_or_else(|| format!("Invalid side to move: {}", parts[1]))?;

    let black_kings = pieces
        .iter()
        .filter(|p| p.side == Side::Black && p.kind == PieceKind::King)
        .count();
    if black_kings > 1 {
        return Err(format!("Layout has {} black kings, at most 1 allowed", black_kings));
    }

    let mut board = Board::empty();
    for piece in pieces {
        board.set_piece_at(piece.position.row, piece.position.col, Some(piece));
    }
    board.set_side_to_move(side);
    Ok(board)
}

fn parse_rows(board_str: &str) -> Result<Vec<Piece>, String> {
    let rows: Vec<&str> = board_str.split('/').collect();
    if rows.len() != BOARD_ROWS as usize {
        return Err(format!(
            "Invalid board: expected {} rows, got {}",
            BOARD_ROWS,
            rows.len()
        ));
    }

    let mut pieces = Vec::new();

    for (row_idx, row_str) in rows.iter().enumerate() {
        let row = row_idx as i8;
        let mut col: i8 = 0;

        for ch in row_str.chars() {
            if col >= BOARD_COLS {
                return Err(format!("Row {} has more than {} columns", row, BOARD_COLS));
            }

            if let Some(digit) = ch.to_digit(10) {
                if digit == 0 || digit > BOARD_COLS as u32 {
                    return Err(format!("Invalid empty count in row {}: {}", row, ch));
                }
                col += digit as i8;
            } else {
                let kind = PieceKind::from_notation_char(ch)
                    .ok_or_else(|| format!("Invalid piece char: {}", ch))?;
                let side = if ch.is_ascii_uppercase() {
                    Side::Red
                } else {
                    Side::Black
                };
                pieces.push(Piece::new(kind, side, Position::new(row, col)));
                col += 1;
            }
        }

        if col != BOARD_COLS {
            return Err(format!(
                "Row {} has {} columns, expected {}",
                row, col, BOARD_COLS
            ));
        }
    }

    Ok(pieces)
}

/// 生成棋盘的布局记号
pub fn to_layout(board: &Board) -> String {
    let mut rows = Vec::with_capacity(BOARD_ROWS as usize);

    for row in 0..BOARD_ROWS {
        let mut row_str = String::new();
        let mut empty_count = 0;

        for col in 0..BOARD_COLS {
            match board.get_piece_at(row, col) {
                Some(piece) => {
                    if empty_count > 0 {
                        row_str.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row_str.push(piece.to_notation_char());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            row_str.push_str(&empty_count.to_string());
        }
        rows.push(row_str);
    }

    format!(
        "{} {}",
        rows.join("/"),
        board.side_to_move().to_notation_char()
    )
}

/// 文本棋盘（CLI 打印用）
pub fn render_ascii(board: &Board) -> String {
    let mut out = String::from("  a b c d e f g h\n");
    for row in 0..BOARD_ROWS {
        out.push_str(&row.to_string());
        for col in 0..BOARD_COLS {
            out.push(' ');
            out.push(board.get_piece_at(row, col).map_or('.', |p| p.to_notation_char()));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameStatus;

    const START: &str = "8/8/3p1p1p/8/8/8/3R4/8/8 r";

    #[test]
    fn test_parse_start_layout() {
        let board = parse_layout(START).unwrap();
        let fresh = Board::new();

        assert_eq!(board.grid(), fresh.grid());
        assert_eq!(board.side_to_move(), Side::Red);
        assert_eq!(board.status(), GameStatus::Playing);
    }

    #[test]
    fn test_layout_roundtrip() {
        let layout = "3k4/8/2n1c3/8/1p4a1/8/3R4/5b2/8 b";
        let board = parse_layout(layout).unwrap();
        assert_eq!(to_layout(&board), layout);
        assert_eq!(board.side_to_move(), Side::Black);
        assert_eq!(board.find_king(Side::Black), Some(Position::new(0, 3)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_layout("8/8/8 r").is_err());
        assert!(parse_layout("8/8/8/8/8/8/8/8/8").is_err());
        assert!(parse_layout("8/8/8/8/8/8/8/8/8 x").is_err());
        assert!(parse_layout("8/8/8/8/8/8/8/8/9 r").is_err());
        assert!(parse_layout("8/8/8/8/8/8/8/8/7 r").is_err());
        assert!(parse_layout("8/8/8/8/8/8/8/8/7z r").is_err());
        assert!(parse_layout("k7/8/8/8/8/8/8/8/7k r").is_err(), "两个黑将");
    }

    #[test]
    fn test_render_ascii() {
        let text = render_ascii(&Board::new());
        assert!(text.starts_with("  a b c d e f g h\n"));
        assert!(text.contains("2 . . . p . p . p"));
        assert!(text.contains("6 . . . R . . . ."));
    }
}
