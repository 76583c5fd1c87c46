//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{
    BLACK_HOME_ROW, BLACK_PAWN_ROW, BOARD_SIZE, WHITE_HOME_ROW, WHITE_PAWN_ROW,
};
use crate::piece::{Piece, PieceIds, PieceType, Position, Side};

/// 底线从左到右的棋子排列
const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// 棋盘
///
/// 纯存储：8x8 的可空棋子格，不含任何规则知识，
/// 轮次、易位资格等都由 Game 负责。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// 8x8 棋盘，索引为 (row-1) * 8 + (col-1)，使用 Vec 以支持 serde
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; BOARD_SIZE * BOARD_SIZE],
        }
    }

    /// 创建初始棋盘，棋子编号由传入的发生器发放
    pub fn initial(ids: &mut PieceIds) -> Self {
        let mut board = Self::empty();
        board.reset(ids);
        board
    }

    /// 摆成开局排列：兵在 2/7 行，底线为车马象后王象马车
    pub fn reset(&mut self, ids: &mut PieceIds) {
        self.squares = vec![None; BOARD_SIZE * BOARD_SIZE];
        for (i, piece_type) in BACK_RANK.into_iter().enumerate() {
            let col = i as u8 + 1;
            self.set(
                Position::new_unchecked(WHITE_HOME_ROW, col),
                Some(ids.fresh(piece_type, Side::White)),
            );
            self.set(
                Position::new_unchecked(BLACK_HOME_ROW, col),
                Some(ids.fresh(piece_type, Side::Black)),
            );
        }
        for col in 1..=BOARD_SIZE as u8 {
            self.set(
                Position::new_unchecked(WHITE_PAWN_ROW, col),
                Some(ids.fresh(PieceType::Pawn, Side::White)),
            );
            self.set(
                Position::new_unchecked(BLACK_PAWN_ROW, col),
                Some(ids.fresh(PieceType::Pawn, Side::Black)),
            );
        }
    }

    /// 获取指定位置的棋子
    pub fn get(&self, pos: Position) -> Option<Piece> {
        if pos.is_valid() {
            self.squares[pos.to_index()]
        } else {
            None
        }
    }

    /// 放置或清空指定位置
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        if pos.is_valid() {
            self.squares[pos.to_index()] = piece;
        }
    }

    /// 查找指定阵营的王的位置
    pub fn find_king(&self, side: Side) -> Option<Position> {
        self.all_pieces()
            .into_iter()
            .find(|(_, piece)| piece.piece_type == PieceType::King && piece.side == side)
            .map(|(pos, _)| pos)
    }

    /// 按棋子身份（含编号）查找位置
    pub fn find_piece(&self, piece: Piece) -> Option<Position> {
        self.all_pieces()
            .into_iter()
            .find(|(_, p)| *p == piece)
            .map(|(pos, _)| pos)
    }

    /// 获取指定阵营的所有棋子及位置
    pub fn pieces(&self, side: Side) -> Vec<(Position, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.side == side)
            .collect()
    }

    /// 获取所有棋子及位置
    pub fn all_pieces(&self) -> Vec<(Position, Piece)> {
        let mut result = Vec::new();
        for index in 0..BOARD_SIZE * BOARD_SIZE {
            if let Some(piece) = self.squares[index] {
                // index 一定在界内
                if let Some(pos) = Position::from_index(index) {
                    result.push((pos, piece));
                }
            }
        }
        result
    }

    /// 棋盘上出现过的最大棋子编号
    pub fn max_piece_id(&self) -> Option<u32> {
        self.all_pieces().into_iter().map(|(_, p)| p.id).max()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial(&mut PieceIds::new())
    }
}
