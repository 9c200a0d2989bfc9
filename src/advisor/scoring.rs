//! 落点打分
//!
//! 吃子：`基础价值 × capture_multiplier`，炮、车、将再乘 `high_value_capture_bonus`，
//! 另加逃生路线数作为平分依据。
//!
//! 空位：逃生路线 + 威胁价值 + 多重威胁奖励 − 角落惩罚；
//! 充能时再加十字线上黑子价值的 70% 与中心位置奖励。结果不低于 0。

use super::AdvisorConfig;
use crate::ability::cross_targets;
use crate::piece::{can_attack, Grid, Occupancy, Piece};
use crate::types::{PieceKind, Position, Side, ORTHOGONAL};

/// 吃掉某类棋子的分数
pub fn capture_value(kind: PieceKind, config: &AdvisorConfig) -> f64 {
    let base = kind.base_value() as f64 * config.capture_multiplier;
    if kind.is_priority_target() {
        base * config.high_value_capture_bonus
    } else {
        base
    }
}

/// 四个方向（右、左、下、上）的连续空格数
pub fn ray_lengths(occupancy: &Occupancy<'_>, from: Position) -> [usize; 4] {
    let mut lengths = [0; 4];
    for (i, (dr, dc)) in ORTHOGONAL.into_iter().enumerate() {
        let mut pos = from.offset(dr, dc);
        while pos.is_valid() && !occupancy.is_occupied(pos) {
            lengths[i] += 1;
            pos = pos.offset(dr, dc);
        }
    }
    lengths
}

/// 逃生路线：空格数多于 `escape_route_min_steps` 的方向
pub fn count_escape_routes(occupancy: &Occupancy<'_>, from: Position, config: &AdvisorConfig) -> usize {
    ray_lengths(occupancy, from)
        .iter()
        .filter(|&&len| len > config.escape_route_min_steps)
        .count()
}

/// 车在 `from` 时一步能吃到的黑子（每个方向上的第一个棋子）
pub fn threatened_targets(occupancy: &Occupancy<'_>, from: Position) -> Vec<Position> {
    let mut targets = Vec::new();
    for (dr, dc) in ORTHOGONAL {
        let mut pos = from.offset(dr, dc);
        while pos.is_valid() {
            if let Some(piece) = occupancy.piece_at(pos) {
                if piece.side == Side::Black {
                    targets.push(pos);
                }
                break;
            }
            pos = pos.offset(dr, dc);
        }
    }
    targets
}

/// 目标是否有其他黑子保护（车吃过去后会被反吃）
pub fn is_protected(grid: &Grid, target: Position, vacated: &[Position]) -> bool {
    let occupancy = Occupancy::new(grid, vacated);
    occupancy
        .pieces()
        .filter(|p| p.side == Side::Black && p.position != target)
        .any(|p| can_attack(p, target, &occupancy))
}

/// 威胁价值：无保护的目标是真威胁，计满分；有保护的是假威胁，几乎不计分
///
/// `vacated` 是车走过之后视为空的格子（通常是车的原位）。
pub fn evaluate_threat_value(
    grid: &Grid,
    target: Position,
    vacated: &[Position],
    config: &AdvisorConfig,
) -> f64 {
    let kind = match grid.get(target) {
        Some(piece) if piece.side == Side::Black => piece.kind,
        _ => return 0.0,
    };
    let full = kind.base_value() as f64 * config.threat_weight;
    if is_protected(grid, target, vacated) {
        full * config.fake_threat_discount
    } else {
        full
    }
}

/// 充能时，十字线上全部黑子价值的一定比例
pub fn elimination_value(grid: &Grid, from: Position, config: &AdvisorConfig) -> f64 {
    let total: i32 = cross_targets(grid, from)
        .into_iter()
        .filter_map(|pos| grid.get(pos))
        .map(|p| p.kind.base_value())
        .sum();
    total as f64 * config.elimination_ratio
}

/// 中心位置奖励：四个方向都足够开阔时，按总空格数计分
pub fn central_bonus(occupancy: &Occupancy<'_>, from: Position, config: &AdvisorConfig) -> f64 {
    let lengths = ray_lengths(occupancy, from);
    if lengths.iter().all(|&len| len >= config.central_min_steps) {
        lengths.iter().sum::<usize>() as f64 * config.central_weight
    } else {
        0.0
    }
}

/// 空位的位置战术价值
pub fn positional_value(
    grid: &Grid,
    mover: &Piece,
    to: Position,
    charged: bool,
    config: &AdvisorConfig,
) -> f64 {
    let vacated = [mover.position];
    let occupancy = Occupancy::new(grid, &vacated);
    let mut value = 0.0;

    // 1. 逃生路线
    value += count_escape_routes(&occupancy, to, config) as f64 * config.escape_route_weight;

    // 2. 威胁
    let targets = threatened_targets(&occupancy, to);
    for &target in &targets {
        value += evaluate_threat_value(grid, target, &vacated, config);
    }

    // 3. 多重威胁（叉攻），有保护的目标也算
    if targets.len() >= 2 {
        value += targets.len() as f64 * config.multi_target_weight;
    }

    // 4. 角落
    if to.is_corner() {
        value -= config.corner_penalty;
    }

    // 5. 充能
    if charged {
        value += elimination_value(grid, to, config);
        value += central_bonus(&occupancy, to, config);
    }

    value.max(0.0)
}

/// 候选落点的总分
pub fn score_candidate(
    grid: &Grid,
    mover: &Piece,
    to: Position,
    charged: bool,
    config: &AdvisorConfig,
) -> f64 {
    match grid.get(to) {
        Some(target) if target.side != mover.side => {
            let vacated = [mover.position];
            let occupancy = Occupancy::new(grid, &vacated);
            let tiebreak = count_escape_routes(&occupancy, to, config) as f64;
            capture_value(target.kind, config) + tiebreak * config.capture_tiebreak_weight
        }
        _ => positional_value(grid, mover, to, charged, config),
    }
}
