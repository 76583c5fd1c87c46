//! 棋子定义

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_SIZE;

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceType {
    /// 兵
    Pawn,
    /// 车
    Rook,
    /// 马
    Knight,
    /// 象
    Bishop,
    /// 后
    Queen,
    /// 王
    King,
}

impl PieceType {
    /// 兵升变可选的四种类型
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// 白方（先手，在下方）
    White,
    /// 黑方（后手，在上方）
    Black,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// 兵的前进方向（行增量）
    pub fn forward(&self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }
}

/// 棋子
///
/// `id` 区分同型同色的棋子。王车易位资格和吃过路兵都按棋子身份
/// 记录，升变产生的新子必须与原有棋子可区分，序列化后也要保持。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub piece_type: PieceType,
    #[serde(rename = "teamColor")]
    pub side: Side,
    pub id: u32,
}

impl Piece {
    /// 创建新棋子
    pub fn new(piece_type: PieceType, side: Side, id: u32) -> Self {
        Self {
            piece_type,
            side,
            id,
        }
    }
}

/// 棋子编号发生器
///
/// 每个 Game 持有自己的计数器，编号只在单局内单调递增，
/// 不使用进程级全局状态。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceIds {
    next: u32,
}

impl PieceIds {
    /// 创建从 0 开始的编号发生器
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// 发放一个新棋子
    pub fn fresh(&mut self, piece_type: PieceType, side: Side) -> Piece {
        let id = self.next;
        self.next += 1;
        Piece::new(piece_type, side, id)
    }

    /// 把计数器推进到指定编号之后（用于从快照恢复）
    pub fn bump_past(&mut self, id: u32) {
        if self.next <= id {
            self.next = id + 1;
        }
    }
}

/// 棋盘位置
///
/// 行列都是 1..=8，行 1 是靠近白方的一侧。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 行 (1-8)
    pub row: u8,
    /// 列 (1-8)
    pub col: u8,
}

impl Position {
    /// 创建新位置
    pub fn new(row: u8, col: u8) -> Option<Self> {
        let pos = Self { row, col };
        if pos.is_valid() {
            Some(pos)
        } else {
            None
        }
    }

    /// 创建新位置（不检查边界，内部使用）
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 检查位置是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (1..=BOARD_SIZE as u8).contains(&self.row) && (1..=BOARD_SIZE as u8).contains(&self.col)
    }

    /// 获取偏移后的位置
    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Position> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if row >= 1 && row <= BOARD_SIZE as i8 && col >= 1 && col <= BOARD_SIZE as i8 {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> usize {
        (self.row as usize - 1) * BOARD_SIZE + (self.col as usize - 1)
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Some(Position {
                row: (index / BOARD_SIZE) as u8 + 1,
                col: (index % BOARD_SIZE) as u8 + 1,
            })
        } else {
            None
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
