//! 国际象棋规则引擎
//!
//! 包含:
//! - 棋子、棋盘、位置等核心数据结构
//! - 走法生成和规则验证（含吃过路兵、王车易位、升变）
//! - 对局状态机 (Game): 回合、合法走法、将军/将死/逼和判定
//! - 对局快照格式 (JSON)

mod board;
mod constants;
mod error;
mod game;
mod moves;
mod piece;
mod record;

pub use board::Board;
pub use constants::*;
pub use error::InvalidMove;
pub use game::Game;
pub use moves::{Move, MoveGenerator};
pub use piece::{Piece, PieceIds, PieceType, Position, Side};
pub use record::GameRecord;
