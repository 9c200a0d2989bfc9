//! Xiangqi Pozhen (破阵) Engine
//!
//! 单车破阵残局引擎 - 走法生成、将军判定、十字消除技能与最佳落点推荐

pub mod ability;
pub mod advisor;
pub mod board;
pub mod layout;
pub mod opponent;
pub mod piece;
pub mod session;
pub mod test_positions;
pub mod types;

pub use ability::{cross_targets, AbilityPhase, AbilityState, EliminationReport};
pub use advisor::{AdvisorConfig, CandidateEval, MoveAdvisor, Recommendation};
pub use board::{Board, MoveRecord};
pub use layout::{parse_layout, render_ascii, to_layout};
pub use opponent::RandomOpponent;
pub use piece::{can_attack, Grid, Occupancy, Piece};
pub use session::{GameSession, SessionSnapshot};
pub use types::{GameStatus, PieceKind, Position, Side, BOARD_COLS, BOARD_ROWS};
