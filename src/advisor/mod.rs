//! 最佳落点推荐
//!
//! 只为红车计算。流程：
//! 1. 安全筛选：车离开原位后，落点是否会被任何黑子攻击；
//! 2. 充能时，若落点上的攻击者都在十字消除范围内，视为安全；
//! 3. 没有安全落点时，退回到对全部落点打分（车不能停着不走）；
//! 4. 吃子按价值 × 1000 计分，空位按位置战术价值计分；同分取先出现的。
//!
//! 推荐只读棋盘，从不修改棋盘。

pub mod safety;
pub mod scoring;

use crate::ability::AbilityState;
use crate::board::Board;
use crate::piece::Piece;
use crate::types::{PieceKind, Position};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;

/// 推荐器配置（全部权重可从 JSON 覆盖）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// 吃子分 = 基础价值 × 此倍数
    pub capture_multiplier: f64,
    /// 吃炮、车、将的额外倍率
    pub high_value_capture_bonus: f64,
    /// 吃子时逃生路线数的平分权重
    pub capture_tiebreak_weight: f64,
    /// 每条逃生路线的分数
    pub escape_route_weight: f64,
    /// 一条方向至少要多于这么多空格才算逃生路线
    pub escape_route_min_steps: usize,
    /// 真威胁分 = 目标价值 × 此权重
    pub threat_weight: f64,
    /// 假威胁（目标有保护）的折扣
    pub fake_threat_discount: f64,
    /// 同时威胁多个目标时，每个目标的奖励
    pub multi_target_weight: f64,
    pub corner_penalty: f64,
    /// 充能时十字线上黑子总价值计入的比例
    pub elimination_ratio: f64,
    /// 充能时中心位置奖励（× 四向空格总数）
    pub central_weight: f64,
    /// 四个方向都至少有这么多空格才给中心奖励
    pub central_min_steps: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        AdvisorConfig {
            capture_multiplier: 1000.0,
            high_value_capture_bonus: 1.3,
            capture_tiebreak_weight: 1.0,
            escape_route_weight: 2.0,
            escape_route_min_steps: 2,
            threat_weight: 1.0,
            fake_threat_discount: 0.05,
            multi_target_weight: 15.0,
            corner_penalty: 10.0,
            elimination_ratio: 0.7,
            central_weight: 1.5,
            central_min_steps: 2,
        }
    }
}

impl AdvisorConfig {
    /// 从 JSON 字符串读取，缺失字段取默认值
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid advisor config: {}", e))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
        Self::from_json_str(&content)
    }
}

/// 单个候选落点的评估
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateEval {
    pub to: Position,
    /// 落点上被吃的黑子
    pub capture: Option<PieceKind>,
    pub safe: bool,
    /// 原本危险，因十字消除而视为安全
    pub rescued_by_elimination: bool,
    /// 能攻击落点的黑子
    pub attackers: Vec<Position>,
    pub score: f64,
}

/// 推荐结果
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Recommendation {
    /// 最佳落点在候选列表中的下标
    pub best: Option<usize>,
    /// 没有安全落点，被迫在全部落点中选择
    pub fallback: bool,
    pub candidates: Vec<CandidateEval>,
}

impl Recommendation {
    pub fn best_position(&self) -> Option<Position> {
        self.best.map(|i| self.candidates[i].to)
    }

    /// 按分数从高到低的下标（同分保持原顺序），只含参与排名的落点
    pub fn ranked(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.candidates.len())
            .filter(|&i| self.fallback || self.candidates[i].safe)
            .collect();
        indices.sort_by(|&a, &b| {
            self.candidates[b]
                .score
                .partial_cmp(&self.candidates[a].score)
                .unwrap_or(Ordering::Equal)
        });
        indices
    }
}

/// 最佳落点推荐器
#[derive(Debug, Clone, Default)]
pub struct MoveAdvisor {
    config: AdvisorConfig,
}

impl MoveAdvisor {
    pub fn new(config: AdvisorConfig) -> Self {
        MoveAdvisor { config }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// 推荐最佳落点下标；候选为空或棋子不是红车时返回 None
    pub fn recommend(
        &self,
        board: &Board,
        ability: &AbilityState,
        piece: &Piece,
        candidates: &[Position],
    ) -> Option<usize> {
        self.analyze(board, ability, piece, candidates).best
    }

    /// 评估全部候选落点，附带每个落点的安全性和分数
    pub fn analyze(
        &self,
        board: &Board,
        ability: &AbilityState,
        piece: &Piece,
        candidates: &[Position],
    ) -> Recommendation {
        if candidates.is_empty() || !piece.is_controlled_rook() {
            return Recommendation::default();
        }

        let grid = board.grid();
        let charged = ability.is_charged();

        let evals: Vec<CandidateEval> = candidates
            .iter()
            .map(|&to| {
                let verdict = safety::assess(grid, piece, to, charged);
                let score = scoring::score_candidate(grid, piece, to, charged, &self.config);
                let eval = CandidateEval {
                    to,
                    capture: grid
                        .get(to)
                        .filter(|t| t.side != piece.side)
                        .map(|t| t.kind),
                    safe: verdict.safe,
                    rescued_by_elimination: verdict.rescued_by_elimination,
                    attackers: verdict.attackers,
                    score,
                };
                log::trace!(
                    "candidate {} safe={} rescued={} score={:.2}",
                    to,
                    eval.safe,
                    eval.rescued_by_elimination,
                    score
                );
                eval
            })
            .collect();

        let fallback = !evals.iter().any(|e| e.safe);
        if fallback {
            log::debug!("no safe square for rook at {}, ranking all candidates", piece.position);
        }

        let mut best: Option<usize> = None;
        for (i, eval) in evals.iter().enumerate() {
            if !fallback && !eval.safe {
                continue;
            }
            // 严格大于：同分时保留先出现的落点
            if best.map_or(true, |b| eval.score > evals[b].score) {
                best = Some(i);
            }
        }

        log::debug!(
            "advisor best for rook at {}: {:?}",
            piece.position,
            best.map(|i| evals[i].to)
        );

        Recommendation {
            best,
            fallback,
            candidates: evals,
        }
    }
}
