//! 棋盘常量定义

/// 棋盘边长（行数 = 列数）
pub const BOARD_SIZE: usize = 8;

/// 白方底线行（1 为靠近白方的一侧）
pub const WHITE_HOME_ROW: u8 = 1;

/// 黑方底线行
pub const BLACK_HOME_ROW: u8 = 8;

/// 白兵初始行
pub const WHITE_PAWN_ROW: u8 = 2;

/// 黑兵初始行
pub const BLACK_PAWN_ROW: u8 = 7;

/// 王的初始列（王车易位的前提）
pub const KING_START_COL: u8 = 5;
