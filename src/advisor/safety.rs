//! 落点安全性
//!
//! 攻击判定在 [`Occupancy`] 视图上计算：走子方的原位视为空，
//! 充能时十字消除会除掉的黑子也视为空。棋盘本身不被修改。

use crate::ability::cross_targets;
use crate::piece::{can_attack, Grid, Occupancy, Piece};
use crate::types::{Position, Side};

/// 安全性结论
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyVerdict {
    pub safe: bool,
    pub rescued_by_elimination: bool,
    /// 走子方原位腾空后攻击落点的黑子（不考虑十字消除）
    pub attackers: Vec<Position>,
}

/// 某位置是否被 `defender` 的对方攻击
///
/// `vacated` 中的格子视为空；站在 `target` 上的棋子不算攻击者（它会被吃掉）。
pub fn is_position_under_attack(
    grid: &Grid,
    target: Position,
    defender: Side,
    vacated: &[Position],
) -> bool {
    let occupancy = Occupancy::new(grid, vacated);
    occupancy
        .pieces()
        .filter(|p| p.side != defender && p.position != target)
        .any(|p| can_attack(p, target, &occupancy))
}

/// 所有能攻击到 `target` 的对方棋子位置
pub fn attackers_of(
    grid: &Grid,
    target: Position,
    defender: Side,
    vacated: &[Position],
) -> Vec<Position> {
    let occupancy = Occupancy::new(grid, vacated);
    occupancy
        .pieces()
        .filter(|p| p.side != defender && p.position != target)
        .filter(|p| can_attack(p, target, &occupancy))
        .map(|p| p.position)
        .collect()
}

/// 安全评估；`charged` 时允许十字消除挽救危险落点
pub fn assess(grid: &Grid, mover: &Piece, to: Position, charged: bool) -> SafetyVerdict {
    let attackers = attackers_of(grid, to, mover.side, &[mover.position]);
    if attackers.is_empty() {
        return SafetyVerdict {
            safe: true,
            rescued_by_elimination: false,
            attackers,
        };
    }

    let rescued = charged && survives_elimination(grid, mover, to);
    SafetyVerdict {
        safe: rescued,
        rescued_by_elimination: rescued,
        attackers,
    }
}

/// 落到 `to` 并立即十字消除后，是否还有攻击者
fn survives_elimination(grid: &Grid, mover: &Piece, to: Position) -> bool {
    let mut vacated = cross_targets(grid, to);
    vacated.push(mover.position);
    !is_position_under_attack(grid, to, mover.side, &vacated)
}
