//! 走法生成和验证

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constants::{BLACK_HOME_ROW, BLACK_PAWN_ROW, WHITE_HOME_ROW, WHITE_PAWN_ROW};
use crate::piece::{Piece, PieceType, Position, Side};

/// 直线方向（车）
const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// 斜线方向（象）
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// 马的 8 个跳跃偏移
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (-2, 1),
    (-2, -1),
];

/// 王的 8 个相邻偏移
const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// 走法
///
/// 相等性和哈希只看起点和终点，忽略升变类型：
/// 调用方靠 `valid_moves.contains(mv)` 做合法性判断，
/// 带不同升变类型的同一步棋必须视为同一走法。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Move {
    /// 起始位置
    pub from: Position,
    /// 目标位置
    pub to: Position,
    /// 升变类型（仅兵到达底线时有意义）
    pub promotion: Option<PieceType>,
}

impl Move {
    /// 创建新走法
    pub fn new(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// 创建带升变的走法
    pub fn with_promotion(from: Position, to: Position, promotion: PieceType) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// 走法生成器
///
/// 只生成棋子自身的原始走法，不考虑送将，也不含
/// 吃过路兵和王车易位（这两类由 Game 补充）。
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成指定棋子的所有原始走法
    pub fn piece_moves(board: &Board, pos: Position, piece: Piece) -> Vec<Move> {
        let mut moves = Vec::new();
        match piece.piece_type {
            PieceType::Pawn => Self::pawn_moves(board, pos, piece.side, &mut moves),
            PieceType::Rook => Self::ray_moves(board, pos, piece.side, &ORTHOGONAL, &mut moves),
            PieceType::Bishop => Self::ray_moves(board, pos, piece.side, &DIAGONAL, &mut moves),
            PieceType::Queen => {
                Self::ray_moves(board, pos, piece.side, &ORTHOGONAL, &mut moves);
                Self::ray_moves(board, pos, piece.side, &DIAGONAL, &mut moves);
            }
            PieceType::Knight => {
                Self::offset_moves(board, pos, piece.side, &KNIGHT_OFFSETS, &mut moves)
            }
            PieceType::King => {
                Self::offset_moves(board, pos, piece.side, &KING_OFFSETS, &mut moves)
            }
        }
        moves
    }

    /// 生成兵的走法
    fn pawn_moves(board: &Board, pos: Position, side: Side, moves: &mut Vec<Move>) {
        let forward = side.forward();
        let start_row = match side {
            Side::White => WHITE_PAWN_ROW,
            Side::Black => BLACK_PAWN_ROW,
        };

        // 前进一格，目标必须为空
        if let Some(to) = pos.offset(forward, 0) {
            if board.get(to).is_none() {
                Self::push_pawn_move(pos, to, side, moves);

                // 初始行可前进两格，前方一格也必须为空
                if pos.row == start_row {
                    if let Some(two) = pos.offset(2 * forward, 0) {
                        if board.get(two).is_none() {
                            moves.push(Move::new(pos, two));
                        }
                    }
                }
            }
        }

        // 斜吃，目标必须是对方棋子
        for d_col in [-1, 1] {
            if let Some(to) = pos.offset(forward, d_col) {
                if let Some(target) = board.get(to) {
                    if target.side != side {
                        Self::push_pawn_move(pos, to, side, moves);
                    }
                }
            }
        }
    }

    /// 添加兵的走法，到达底线时展开成四种升变
    fn push_pawn_move(from: Position, to: Position, side: Side, moves: &mut Vec<Move>) {
        let last_row = match side {
            Side::White => BLACK_HOME_ROW,
            Side::Black => WHITE_HOME_ROW,
        };
        if to.row == last_row {
            for promotion in PieceType::PROMOTIONS {
                moves.push(Move::with_promotion(from, to, promotion));
            }
        } else {
            moves.push(Move::new(from, to));
        }
    }

    /// 沿固定方向扫描直到棋盘边缘或被阻挡，可吃遇到的第一个敌子
    fn ray_moves(
        board: &Board,
        pos: Position,
        side: Side,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(d_row, d_col) in directions {
            let mut current = pos;
            while let Some(to) = current.offset(d_row, d_col) {
                if let Some(target) = board.get(to) {
                    if target.side != side {
                        moves.push(Move::new(pos, to));
                    }
                    break;
                }
                moves.push(Move::new(pos, to));
                current = to;
            }
        }
    }

    /// 固定偏移集合，保留界内且非己方占据的目标
    fn offset_moves(
        board: &Board,
        pos: Position,
        side: Side,
        offsets: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(d_row, d_col) in offsets {
            if let Some(to) = pos.offset(d_row, d_col) {
                match board.get(to) {
                    Some(target) if target.side == side => {}
                    _ => moves.push(Move::new(pos, to)),
                }
            }
        }
    }
}
