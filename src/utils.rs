use crate::engine::{BoardConfig, Tile, MAX_WIDTH};
use crate::error::{InvalidBoardReason, PuzzleError};

/// Extracts board tokens from free-form text.
///
/// A token is either a run of ASCII digits or an occurrence of `marker`.
/// Tokens are returned in order of appearance; everything else in `text` is
/// skipped. Digit runs take precedence over the marker.
///
/// # Examples
/// ```
/// use fifteen_solver::utils::tokenize;
///
/// assert_eq!(tokenize("1s2s3 x\t10asdf11", "x"), vec!["1", "2", "3", "x", "10", "11"]);
/// assert_eq!(tokenize("no tokens here", "#"), Vec::<&str>::new());
/// ```
pub fn tokenize<'a>(text: &'a str, marker: &str) -> Vec<&'a str> {
    let mut tokens = Vec::new();
    let bytes = text.as_bytes();
    let mut pos = 0;

    while pos < text.len() {
        if bytes[pos].is_ascii_digit() {
            let start = pos;
            while pos < text.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            tokens.push(&text[start..pos]);
        } else if !marker.is_empty() && text[pos..].starts_with(marker) {
            tokens.push(&text[pos..pos + marker.len()]);
            pos += marker.len();
        } else {
            // Skip one whole character so `pos` stays on a char boundary.
            pos += text[pos..].chars().next().map_or(1, char::len_utf8);
        }
    }

    tokens
}

/// Turns extracted tokens into cells for a board described by `config`.
///
/// # Returns
/// * `Ok(Vec<Tile>)` with one tile per token.
/// * `Err(PuzzleError::InvalidBoard)` if the token count is not
///   `width * width`, a label is zero or too large, or a token is neither a
///   number nor the marker.
pub fn cells_from_tokens(tokens: &[&str], config: &BoardConfig) -> Result<Vec<Tile>, PuzzleError> {
    let expected = config.cell_count();
    if tokens.len() != expected {
        return Err(InvalidBoardReason::WrongTokenCount {
            expected,
            found: tokens.len(),
        }
        .into());
    }

    let max = expected - 1;
    tokens
        .iter()
        .map(|&token| -> Result<Tile, PuzzleError> {
            if token == config.empty_marker() {
                return Ok(Tile::Empty);
            }
            let label = token.parse::<u64>().map_err(|_| InvalidBoardReason::UnparsableToken {
                token: token.to_string(),
            })?;
            if label == 0 || label > max as u64 {
                return Err(InvalidBoardReason::LabelOutOfRange { label, max }.into());
            }
            Ok(Tile::Label(label as u16))
        })
        .collect()
}

/// Checks that `cells` is a permutation of `1..width*width` plus exactly one
/// empty cell.
///
/// # Returns
/// The index of the empty cell.
pub fn validate_cells(cells: &[Tile], width: usize) -> Result<usize, PuzzleError> {
    if !(2..=MAX_WIDTH).contains(&width) {
        return Err(InvalidBoardReason::InvalidWidth { width }.into());
    }
    let expected = width * width;
    if cells.len() != expected {
        return Err(InvalidBoardReason::WrongTokenCount {
            expected,
            found: cells.len(),
        }
        .into());
    }

    let max = expected - 1;
    let mut seen = vec![false; expected];
    let mut empty = None;

    for (index, tile) in cells.iter().enumerate() {
        match *tile {
            Tile::Empty => {
                if empty.is_some() {
                    return Err(InvalidBoardReason::MultipleEmpty.into());
                }
                empty = Some(index);
            }
            Tile::Label(label) => {
                let slot = label as usize;
                if slot == 0 || slot > max {
                    return Err(InvalidBoardReason::LabelOutOfRange {
                        label: label as u64,
                        max,
                    }
                    .into());
                }
                if seen[slot] {
                    return Err(InvalidBoardReason::DuplicateLabel { label }.into());
                }
                seen[slot] = true;
            }
        }
    }

    // With the count, range and duplicate checks passed, one empty cell
    // implies every label is present.
    empty.ok_or_else(|| InvalidBoardReason::MissingEmpty.into())
}
