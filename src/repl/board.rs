//! ASCII board rendering for the text front end.

use shakmaty::{Chess, Position};

use crate::domain::{shakmaty_to_piece, to_square};

/// Render the position as an 8x8 character grid with rank and file labels,
/// white's side at the bottom. Uppercase is white, lowercase is black.
pub fn render(position: &Chess) -> String {
    let mut out = String::new();
    for row in 0..8 {
        let rank = 8 - row;
        out.push_str(&format!("{rank} "));
        for col in 0..8 {
            let symbol = position
                .board()
                .piece_at(to_square(row, col))
                .map(|p| shakmaty_to_piece(p).symbol())
                .unwrap_or('.');
            out.push(' ');
            out.push(symbol);
        }
        out.push('\n');
    }
    out.push_str("   a b c d e f g h\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_initial_position() {
        let board = render(&Chess::default());
        let lines: Vec<&str> = board.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8  r n b q k b n r");
        assert_eq!(lines[1], "7  p p p p p p p p");
        assert_eq!(lines[4], "4  . . . . . . . .");
        assert_eq!(lines[7], "1  R N B Q K B N R");
        assert_eq!(lines[8], "   a b c d e f g h");
    }
}
