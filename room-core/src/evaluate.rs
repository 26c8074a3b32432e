use room_types::LetterMark;

/// Score a guess against the secret, producing one mark per position.
///
/// Two passes over the guess. The first marks exact positions `Correct`
/// and consumes the matched secret letter. The second searches the
/// unconsumed remainder left to right: a hit is `Present` and consumes
/// that occurrence, a miss is `Absent`. Consumption caps the credited
/// marks for any letter at its occurrence count in the secret, so a guess
/// repeating a letter cannot be credited twice for one occurrence.
///
/// Callers guarantee equal-length, lowercased input; under that contract
/// this cannot fail.
pub fn evaluate(secret: &str, guess: &str) -> Vec<LetterMark> {
    let mut remaining: Vec<Option<char>> = secret.chars().map(Some).collect();
    let guess_chars: Vec<char> = guess.chars().collect();
    let mut marks = vec![LetterMark::Absent; guess_chars.len()];

    for (i, &ch) in guess_chars.iter().enumerate() {
        if remaining[i] == Some(ch) {
            marks[i] = LetterMark::Correct;
            remaining[i] = None;
        }
    }

    for (i, &ch) in guess_chars.iter().enumerate() {
        if marks[i] == LetterMark::Correct {
            continue;
        }
        if let Some(slot) = remaining.iter_mut().find(|slot| **slot == Some(ch)) {
            marks[i] = LetterMark::Present;
            *slot = None;
        }
    }

    marks
}
