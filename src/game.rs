//! 对局状态机
//!
//! 负责回合、吃过路兵资格、王车易位资格的记账，
//! 以及合法走法过滤和将军/将死/逼和判定。

use std::collections::HashSet;

use tracing::debug;

use crate::board::Board;
use crate::constants::{BLACK_HOME_ROW, KING_START_COL, WHITE_HOME_ROW};
use crate::error::InvalidMove;
use crate::moves::{Move, MoveGenerator};
use crate::piece::{Piece, PieceIds, PieceType, Position, Side};

/// 一局棋
///
/// 单线程、同步、无 I/O。同一局被多个连接共享时，
/// 调用方必须对 `make_move` 做串行化（如按对局 id 加锁）。
#[derive(Debug, Clone)]
pub struct Game {
    /// 棋盘（唯一归属）
    board: Board,
    /// 当前走子方
    turn: Side,
    /// 上一步刚走过两格的兵（至多一个，仅存活一个回合）
    en_passant: Option<Piece>,
    /// 走过的棋子编号集合（决定易位资格）
    moved: HashSet<u32>,
    /// 本局的棋子编号发生器
    ids: PieceIds,
}

impl Game {
    /// 创建开局排列的新对局，白方先行
    pub fn new() -> Self {
        let mut ids = PieceIds::new();
        let board = Board::initial(&mut ids);
        Self {
            board,
            turn: Side::White,
            en_passant: None,
            moved: HashSet::new(),
            ids,
        }
    }

    /// 从持久化数据恢复对局
    pub fn restore(
        board: Board,
        turn: Side,
        en_passant: Option<Piece>,
        moved: HashSet<u32>,
    ) -> Self {
        let mut ids = PieceIds::new();
        if let Some(max_id) = board.max_piece_id() {
            ids.bump_past(max_id);
        }
        Self {
            board,
            turn,
            en_passant,
            moved,
            ids,
        }
    }

    /// 当前走子方
    pub fn turn(&self) -> Side {
        self.turn
    }

    /// 设置走子方
    pub fn set_turn(&mut self, side: Side) {
        self.turn = side;
    }

    /// 当前棋盘
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 替换棋盘，同时清空易位和过路兵记账（用于重建局面）
    pub fn set_board(&mut self, board: Board) {
        if let Some(max_id) = board.max_piece_id() {
            self.ids.bump_past(max_id);
        }
        self.board = board;
        self.moved.clear();
        self.en_passant = None;
    }

    /// 当前可被吃过路兵的兵
    pub fn en_passant(&self) -> Option<Piece> {
        self.en_passant
    }

    /// 走过的棋子编号
    pub fn moved_ids(&self) -> &HashSet<u32> {
        &self.moved
    }

    /// 指定位置棋子的所有合法走法，空格返回空集合
    ///
    /// 原始走法加上吃过路兵和王车易位，再过滤掉送将的走法。
    pub fn valid_moves(&self, pos: Position) -> HashSet<Move> {
        let piece = match self.board.get(pos) {
            Some(piece) => piece,
            None => return HashSet::new(),
        };

        let mut moves: HashSet<Move> = MoveGenerator::piece_moves(&self.board, pos, piece)
            .into_iter()
            .collect();
        if let Some(mv) = self.en_passant_move(pos, piece) {
            moves.insert(mv);
        }
        for mv in self.castle_moves(pos, piece) {
            moves.insert(mv);
        }

        moves.retain(|mv| !self.leaves_in_check(*mv, piece.side));
        moves
    }

    /// 执行一步棋
    ///
    /// 校验失败时局面不发生任何变化。
    pub fn make_move(&mut self, mv: Move) -> Result<(), InvalidMove> {
        let piece = self
            .board
            .get(mv.from)
            .ok_or_else(|| InvalidMove::new("no piece at the start square"))?;
        if piece.side != self.turn {
            debug!(%mv, "rejected: wrong turn");
            return Err(InvalidMove::new("wrong turn"));
        }
        if !self.valid_moves(mv.from).contains(&mv) {
            debug!(%mv, "rejected: not a legal move");
            return Err(InvalidMove::rejected());
        }

        // 王和车一旦动过就失去易位资格
        if matches!(piece.piece_type, PieceType::King | PieceType::Rook) {
            self.moved.insert(piece.id);
        }

        self.apply_en_passant(mv, piece);
        self.apply_castle(mv, piece);

        match mv.promotion {
            None => self.board.set(mv.to, Some(piece)),
            Some(promotion) => {
                // 升变放入新棋子，并标记为已动过，杜绝用升变车易位
                self.moved.remove(&piece.id);
                let promoted = self.ids.fresh(promotion, piece.side);
                self.moved.insert(promoted.id);
                self.board.set(mv.to, Some(promoted));
            }
        }
        self.board.set(mv.from, None);
        self.turn = self.turn.opponent();
        debug!(%mv, side = ?piece.side, "move applied");
        Ok(())
    }

    /// 指定阵营是否被将军
    ///
    /// 用原始走法判断攻击（用 valid_moves 会无限递归）。
    pub fn is_in_check(&self, side: Side) -> bool {
        Self::in_check_on(&self.board, side)
    }

    /// 指定阵营是否被将死：被将军且全部棋子都无合法走法
    pub fn is_in_checkmate(&self, side: Side) -> bool {
        self.is_in_check(side) && !self.has_any_move(side)
    }

    /// 指定阵营是否被逼和：未被将军且全部棋子都无合法走法
    pub fn is_in_stalemate(&self, side: Side) -> bool {
        !self.is_in_check(side) && !self.has_any_move(side)
    }

    /// 指定阵营是否还有任何合法走法
    fn has_any_move(&self, side: Side) -> bool {
        self.board
            .pieces(side)
            .into_iter()
            .any(|(pos, _)| !self.valid_moves(pos).is_empty())
    }

    /// 在给定棋盘上判断将军
    fn in_check_on(board: &Board, side: Side) -> bool {
        let king_pos = match board.find_king(side) {
            Some(pos) => pos,
            None => return false,
        };

        board.pieces(side.opponent()).into_iter().any(|(pos, piece)| {
            MoveGenerator::piece_moves(board, pos, piece)
                .into_iter()
                .any(|mv| mv.to == king_pos)
        })
    }

    /// 模拟走法后己方是否被将军
    ///
    /// 在克隆的棋盘上模拟，真实棋盘不被触碰。
    fn leaves_in_check(&self, mv: Move, side: Side) -> bool {
        let mut probe = self.board.clone();
        let mover = probe.get(mv.from);
        probe.set(mv.to, mover);
        probe.set(mv.from, None);
        Self::in_check_on(&probe, side)
    }

    /// 该位置棋子可用的吃过路兵走法
    ///
    /// 条件：存在资格兵（对方上一步刚走过两格），走子方的兵与它
    /// 同行且紧邻，落点为资格兵身后一格。
    fn en_passant_move(&self, pos: Position, piece: Piece) -> Option<Move> {
        let target = self.en_passant?;
        if piece.piece_type != PieceType::Pawn || piece.side == target.side {
            return None;
        }

        // 两格推进后：白兵停在 4 行，黑兵停在 5 行
        let rank = match target.side {
            Side::White => 4,
            Side::Black => 5,
        };
        if pos.row != rank {
            return None;
        }

        let behind = -target.side.forward();
        for d_col in [-1, 1] {
            if let Some(beside) = pos.offset(0, d_col) {
                if self.board.get(beside) == Some(target) {
                    return pos.offset(behind, d_col).map(|to| Move::new(pos, to));
                }
            }
        }
        None
    }

    /// 该位置棋子可用的王车易位走法
    ///
    /// 王从未动过且在初始格、当前未被将军、与车之间全空、
    /// 对应的车存在且从未动过，并且王朝该方向走一格本身不送将。
    fn castle_moves(&self, pos: Position, piece: Piece) -> Vec<Move> {
        if piece.piece_type != PieceType::King || self.moved.contains(&piece.id) {
            return Vec::new();
        }
        let home_row = match piece.side {
            Side::White => WHITE_HOME_ROW,
            Side::Black => BLACK_HOME_ROW,
        };
        if pos.row != home_row || pos.col != KING_START_COL {
            return Vec::new();
        }
        if self.is_in_check(piece.side) {
            return Vec::new();
        }

        let mut result = Vec::new();

        // 长易位：车在 1 列，中间 2/3/4 列全空
        let queenside_clear =
            (2..KING_START_COL).all(|col| self.board.get(Position::new_unchecked(home_row, col)).is_none());
        if queenside_clear && self.castle_rook_ready(home_row, 1, piece.side) {
            let step = Move::new(pos, Position::new_unchecked(home_row, KING_START_COL - 1));
            if !self.leaves_in_check(step, piece.side) {
                result.push(Move::new(
                    pos,
                    Position::new_unchecked(home_row, KING_START_COL - 2),
                ));
            }
        }

        // 短易位：车在 8 列，中间 6/7 列全空
        let kingside_clear = (KING_START_COL + 1..8)
            .all(|col| self.board.get(Position::new_unchecked(home_row, col)).is_none());
        if kingside_clear && self.castle_rook_ready(home_row, 8, piece.side) {
            let step = Move::new(pos, Position::new_unchecked(home_row, KING_START_COL + 1));
            if !self.leaves_in_check(step, piece.side) {
                result.push(Move::new(
                    pos,
                    Position::new_unchecked(home_row, KING_START_COL + 2),
                ));
            }
        }
        result
    }

    /// 对应角落是否有本方从未动过的车
    fn castle_rook_ready(&self, row: u8, col: u8, side: Side) -> bool {
        match self.board.get(Position::new_unchecked(row, col)) {
            Some(rook) => {
                rook.piece_type == PieceType::Rook
                    && rook.side == side
                    && !self.moved.contains(&rook.id)
            }
            None => false,
        }
    }

    /// 吃过路兵的副作用和资格更新
    fn apply_en_passant(&mut self, mv: Move, piece: Piece) {
        if piece.piece_type == PieceType::Pawn {
            if let Some(target) = self.en_passant {
                // 兵斜走落到资格兵身后的格子，移除被吃的资格兵
                if let Some(behind) = mv.to.offset(-piece.side.forward(), 0) {
                    if self.board.get(behind) == Some(target) {
                        debug!(%mv, "en passant capture");
                        self.board.set(behind, None);
                    }
                }
            }
        }

        // 资格只存活一个回合
        if piece.piece_type == PieceType::Pawn && mv.from.row.abs_diff(mv.to.row) == 2 {
            self.en_passant = Some(piece);
        } else {
            self.en_passant = None;
        }
    }

    /// 王车易位的副作用：王横跨两列时迁移对应的车
    fn apply_castle(&mut self, mv: Move, piece: Piece) {
        if piece.piece_type != PieceType::King || mv.from.col != KING_START_COL {
            return;
        }
        let row = mv.from.row;
        let (rook_from, rook_to) = if mv.to.col == KING_START_COL + 2 {
            (8, KING_START_COL + 1)
        } else if mv.to.col == KING_START_COL - 2 {
            (1, KING_START_COL - 1)
        } else {
            return;
        };

        let rook_from = Position::new_unchecked(row, rook_from);
        if let Some(rook) = self.board.get(rook_from) {
            debug!(%mv, "castle");
            self.board.set(Position::new_unchecked(row, rook_to), Some(rook));
            self.board.set(rook_from, None);
            self.moved.insert(rook.id);
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
