//! Hebrew-letter numerals for years and small numbers.

const LETTERS: [(u32, char); 22] = [
    (400, 'ת'),
    (300, 'ש'),
    (200, 'ר'),
    (100, 'ק'),
    (90, 'צ'),
    (80, 'פ'),
    (70, 'ע'),
    (60, 'ס'),
    (50, 'נ'),
    (40, 'מ'),
    (30, 'ל'),
    (20, 'כ'),
    (10, 'י'),
    (9, 'ט'),
    (8, 'ח'),
    (7, 'ז'),
    (6, 'ו'),
    (5, 'ה'),
    (4, 'ד'),
    (3, 'ג'),
    (2, 'ב'),
    (1, 'א'),
];

const GERESH: char = '\'';
const GERSHAYIM: char = '"';

/// Encode a Hebrew year in the 5000s, omitting the thousands.
///
/// `5785` becomes `תשפ"ה`. Callers only pass 5001..=5999; other input is not
/// meaningful (the remainder is taken modulo 1000).
pub fn encode(year: i32) -> String {
    punctuate(&letters(year.rem_euclid(1000) as u32))
}

/// Greedy letter sequence for `value`, without punctuation.
fn letters(mut value: u32) -> Vec<char> {
    let mut out = Vec::new();
    for (weight, letter) in LETTERS {
        while value >= weight {
            out.push(letter);
            value -= weight;
        }
    }
    out
}

fn punctuate(letters: &[char]) -> String {
    let mut out = String::with_capacity(letters.len() * 2 + 1);
    match letters.split_last() {
        None => {}
        Some((last, [])) => {
            out.push(*last);
            out.push(GERESH);
        }
        Some((last, head)) => {
            out.extend(head);
            out.push(GERSHAYIM);
            out.push(*last);
        }
    }
    out
}

/// Inverse of [`encode`]: sums the letters and restores the thousands.
///
/// Letter order is not checked, so `פשת"ה` also yields 5785. Callers that need an
/// exact [`encode`] output compare against it.
pub fn decode(text: &str) -> Option<i32> {
    let mut sum = 0u32;
    let mut seen = false;
    for ch in text.chars() {
        if matches!(ch, GERESH | GERSHAYIM | '׳' | '״') {
            continue;
        }
        let (weight, _) = LETTERS.iter().find(|(_, letter)| *letter == ch)?;
        sum += weight;
        seen = true;
    }
    (seen && sum < 1000).then(|| 5000 + sum as i32)
}
