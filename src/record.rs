//! 对局快照格式
//!
//! 供外部存储层序列化/反序列化整局棋的逻辑 JSON 形状。
//! 棋子编号必须原样往返，否则易位和过路兵的记账会失效。

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constants::BOARD_SIZE;
use crate::game::Game;
use crate::piece::{Piece, Position, Side};

/// 对局快照
///
/// `board` 是 8x8 数组，外层按行从白方一侧排列。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// 棋盘，空格为 null
    pub board: Vec<Vec<Option<Piece>>>,
    /// 当前走子方
    pub team_turn: Side,
    /// 可被吃过路兵的兵
    pub en_passant: Option<Piece>,
    /// 走过的棋子编号
    pub has_moved: Vec<u32>,
}

impl GameRecord {
    /// 从对局生成快照
    pub fn from_game(game: &Game) -> Self {
        let mut rows = Vec::with_capacity(BOARD_SIZE);
        for row in 1..=BOARD_SIZE as u8 {
            let mut squares = Vec::with_capacity(BOARD_SIZE);
            for col in 1..=BOARD_SIZE as u8 {
                squares.push(game.board().get(Position::new_unchecked(row, col)));
            }
            rows.push(squares);
        }

        let mut has_moved: Vec<u32> = game.moved_ids().iter().copied().collect();
        has_moved.sort_unstable();

        Self {
            board: rows,
            team_turn: game.turn(),
            en_passant: game.en_passant(),
            has_moved,
        }
    }

    /// 从快照重建对局
    ///
    /// 超出 8x8 的格子被忽略，缺失的行列视为空。
    pub fn into_game(self) -> Game {
        let mut board = Board::empty();
        for (row_index, row) in self.board.into_iter().take(BOARD_SIZE).enumerate() {
            for (col_index, square) in row.into_iter().take(BOARD_SIZE).enumerate() {
                board.set(
                    Position::new_unchecked(row_index as u8 + 1, col_index as u8 + 1),
                    square,
                );
            }
        }
        Game::restore(
            board,
            self.team_turn,
            self.en_passant,
            self.has_moved.into_iter().collect(),
        )
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move;
    use crate::piece::PieceType;

    fn mv(from_row: u8, from_col: u8, to_row: u8, to_col: u8) -> Move {
        Move::new(
            Position::new_unchecked(from_row, from_col),
            Position::new_unchecked(to_row, to_col),
        )
    }

    #[test]
    fn test_record_shape() {
        let game = Game::new();
        let record = GameRecord::from_game(&game);

        assert_eq!(record.board.len(), 8);
        assert!(record.board.iter().all(|row| row.len() == 8));
        assert_eq!(record.team_turn, Side::White);
        assert!(record.en_passant.is_none());
        assert!(record.has_moved.is_empty());

        let json = record.to_json().unwrap();
        assert!(json.contains("\"teamTurn\":\"WHITE\""));
        assert!(json.contains("\"enPassant\":null"));
        assert!(json.contains("\"hasMoved\":[]"));
    }

    #[test]
    fn test_roundtrip_initial() {
        let game = Game::new();
        let json = GameRecord::from_game(&game).to_json().unwrap();
        let restored = GameRecord::from_json(&json).unwrap().into_game();

        assert_eq!(restored.board(), game.board());
        assert_eq!(restored.turn(), game.turn());
        assert_eq!(restored.en_passant(), game.en_passant());
        assert_eq!(restored.moved_ids(), game.moved_ids());
    }

    #[test]
    fn test_roundtrip_mid_game() {
        // 攒出带过路兵资格和易位记账的局面
        let mut game = Game::new();
        game.make_move(mv(2, 5, 4, 5)).unwrap(); // e4
        game.make_move(mv(8, 2, 6, 3)).unwrap(); // Nc6
        game.make_move(mv(1, 5, 2, 5)).unwrap(); // Ke2（王失去易位资格）
        game.make_move(mv(7, 4, 5, 4)).unwrap(); // d5（黑兵两格，资格兵）

        assert!(game.en_passant().is_some());
        assert!(!game.moved_ids().is_empty());

        let json = GameRecord::from_game(&game).to_json().unwrap();
        let restored = GameRecord::from_json(&json).unwrap().into_game();

        assert_eq!(restored.board(), game.board());
        assert_eq!(restored.turn(), game.turn());
        assert_eq!(restored.en_passant(), game.en_passant());
        assert_eq!(restored.moved_ids(), game.moved_ids());
    }

    #[test]
    fn test_restored_game_plays_on() {
        // 恢复后的对局继续走子，过路兵和编号记账都还有效
        let mut game = Game::new();
        game.make_move(mv(2, 5, 4, 5)).unwrap();
        game.make_move(mv(7, 1, 5, 1)).unwrap();
        game.make_move(mv(4, 5, 5, 5)).unwrap();
        game.make_move(mv(7, 4, 5, 4)).unwrap();

        let json = GameRecord::from_game(&game).to_json().unwrap();
        let mut restored = GameRecord::from_json(&json).unwrap().into_game();

        // 恢复后立即可以吃过路兵
        restored.make_move(mv(5, 5, 6, 4)).unwrap();
        assert!(restored.board().get(Position::new_unchecked(5, 4)).is_none());
    }

    #[test]
    fn test_restored_ids_do_not_collide() {
        let mut game = Game::new();
        game.make_move(mv(2, 5, 4, 5)).unwrap();

        let json = GameRecord::from_game(&game).to_json().unwrap();
        let mut restored = GameRecord::from_json(&json).unwrap().into_game();

        // 推进到升变，新编号不得与既有棋子冲突
        restored.make_move(mv(7, 4, 5, 4)).unwrap(); // d5
        restored.make_move(mv(4, 5, 5, 4)).unwrap(); // exd5
        restored.make_move(mv(8, 2, 6, 3)).unwrap(); // Nc6
        restored.make_move(mv(5, 4, 6, 3)).unwrap(); // dxc6
        restored.make_move(mv(7, 8, 6, 8)).unwrap(); // h6
        restored.make_move(mv(6, 3, 7, 2)).unwrap(); // cxb7
        restored.make_move(mv(6, 8, 5, 8)).unwrap(); // h5
        restored
            .make_move(Move::with_promotion(
                Position::new_unchecked(7, 2),
                Position::new_unchecked(8, 1),
                PieceType::Queen,
            ))
            .unwrap(); // bxa8=Q

        let max_seen = restored.board().max_piece_id().unwrap();
        let promoted = restored
            .board()
            .get(Position::new_unchecked(8, 1))
            .unwrap();
        assert_eq!(promoted.id, max_seen);
        assert_eq!(promoted.piece_type, PieceType::Queen);
    }
}
