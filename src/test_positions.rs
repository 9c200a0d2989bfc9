//! 破阵测试局面库
//!
//! 提供命名的布局记号，方便测试、调试和基准测试
//!
//! 命名规范:
//! - START: 初始局面
//! - CAPTURE_n: 吃子取舍
//! - THREAT_n: 威胁与保护
//! - KING_n: 吃将与十字消除
//! - CHECK_n / MATE_n / STALEMATE_n: 棋局状态
//! - DENSE_n: 棋子较多的局面（基准测试用）

// =============================================================================
// 开局 (START)
// =============================================================================

/// 初始局面 - 三个黑卒，一个红车
pub const START: &str = "8/8/3p1p1p/8/8/8/3R4/8/8 r";

// =============================================================================
// 吃子 (CAPTURE)
// =============================================================================

/// 同列无保护的卒
pub const CAPTURE_1: &str = "8/8/3p4/8/8/8/3R4/8/8 r";

/// 吃卒会被车反吃，吃炮安全
pub const CAPTURE_2: &str = "8/8/3p1r2/8/8/8/3R2c1/8/8 r";

/// 马和炮都能吃，炮优先
pub const CAPTURE_3: &str = "8/8/8/8/8/8/n2R2c1/8/8 r";

// =============================================================================
// 威胁 (THREAT)
// =============================================================================

/// 叉攻：(4,3) 同时威胁马和炮
pub const THREAT_1: &str = "8/3n4/8/8/6c1/8/8/8/R7 r";

/// 假威胁：炮有卒保护
pub const THREAT_2: &str = "8/8/8/8/3R2c1/6p1/8/8/8 r";

/// 车困角落，没有安全落点
pub const TRAPPED_1: &str = "Rp6/pp6/8/8/8/8/8/8/8 r";

// =============================================================================
// 吃将与消除 (KING)
// =============================================================================

/// 车直冲吃将，随后第 4 行可以消除两个卒
pub const KING_1: &str = "3k4/8/5n2/8/p6p/8/3R4/8/p7 r";

/// 十字线上有将、马、两个卒
pub const KING_2: &str = "3k4/8/8/8/p2R1pn1/8/8/8/8 r";

/// 充能后 (4,3) 的攻击者在十字线上
pub const CHARGED_1: &str = "8/8/8/8/6r1/8/3R4/8/8 r";

// =============================================================================
// 棋局状态 (CHECK / MATE / STALEMATE)
// =============================================================================

/// 黑将被车将军
pub const CHECK_1: &str = "3k4/8/8/8/8/3R4/8/8/8 b";

/// 黑将被自己的象困住，马将军
pub const MATE_1: &str = "kb6/b1N5/1P6/8/8/8/8/8/8 b";

/// 同上，但没有将军
pub const STALEMATE_1: &str = "kb6/b1P5/1P6/8/8/8/8/8/8 b";

// =============================================================================
// 密集局面 (DENSE)
// =============================================================================

/// 各兵种齐全
pub const DENSE_1: &str = "3k4/1a3a2/2b1n1b1/p1c3c1/3R4/1p1p1p1p/8/2n5/8 r";

// =============================================================================
// 位置集合 - 方便遍历测试
// =============================================================================

/// 所有命名局面
pub const ALL_POSITIONS: [(&str, &str); 14] = [
    ("START", START),
    ("CAPTURE_1", CAPTURE_1),
    ("CAPTURE_2", CAPTURE_2),
    ("CAPTURE_3", CAPTURE_3),
    ("THREAT_1", THREAT_1),
    ("THREAT_2", THREAT_2),
    ("TRAPPED_1", TRAPPED_1),
    ("KING_1", KING_1),
    ("KING_2", KING_2),
    ("CHARGED_1", CHARGED_1),
    ("CHECK_1", CHECK_1),
    ("MATE_1", MATE_1),
    ("STALEMATE_1", STALEMATE_1),
    ("DENSE_1", DENSE_1),
];

/// 按名字查找局面（不区分大小写）
pub fn by_name(name: &str) -> Option<&'static str> {
    ALL_POSITIONS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, layout)| *layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameStatus;
    use crate::Board;

    #[test]
    fn test_all_positions_valid() {
        for (name, layout) in ALL_POSITIONS.iter() {
            let board = Board::from_layout(layout);
            assert!(board.is_ok(), "{} invalid: {:?}", name, board.err());
        }
    }

    #[test]
    fn test_start_matches_new_board() {
        let board = Board::from_layout(START).unwrap();
        assert_eq!(*board.grid(), *Board::new().grid());
    }

    #[test]
    fn test_status_positions() {
        let status = |layout: &str| Board::from_layout(layout).unwrap().status();
        assert_eq!(status(CHECK_1), GameStatus::Check);
        assert_eq!(status(MATE_1), GameStatus::Checkmate);
        assert_eq!(status(STALEMATE_1), GameStatus::Stalemate);
        assert_eq!(status(DENSE_1), GameStatus::Playing);
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("king_1"), Some(KING_1));
        assert_eq!(by_name("START"), Some(START));
        assert_eq!(by_name("nope"), None);
    }
}
