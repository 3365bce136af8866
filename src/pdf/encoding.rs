//! WinAnsiEncoding for the standard Type1 text faces
//!
//! Printable ASCII and the Latin-1 supplement map to their own code points;
//! the 0x80..=0x9F block holds typographic punctuation. Anything else is
//! replaced with `?`.

const REPLACEMENT: u8 = b'?';

const HIGH_BLOCK: &[(char, u8)] = &[
    ('€', 0x80),
    ('‚', 0x82),
    ('ƒ', 0x83),
    ('„', 0x84),
    ('…', 0x85),
    ('†', 0x86),
    ('‡', 0x87),
    ('ˆ', 0x88),
    ('‰', 0x89),
    ('Š', 0x8A),
    ('‹', 0x8B),
    ('Œ', 0x8C),
    ('Ž', 0x8E),
    ('‘', 0x91),
    ('’', 0x92),
    ('“', 0x93),
    ('”', 0x94),
    ('•', 0x95),
    ('–', 0x96),
    ('—', 0x97),
    ('˜', 0x98),
    ('™', 0x99),
    ('š', 0x9A),
    ('›', 0x9B),
    ('œ', 0x9C),
    ('ž', 0x9E),
    ('Ÿ', 0x9F),
];

/// WinAnsi code of a character, if the encoding has one
pub fn win_ansi_code(ch: char) -> Option<u8> {
    match u32::from(ch) {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => u8::try_from(code).ok(),
        _ => HIGH_BLOCK
            .iter()
            .find(|(candidate, _)| *candidate == ch)
            .map(|(_, code)| *code),
    }
}

/// Encode text for a `Tj` operand; control characters become spaces
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| {
            if ch.is_control() {
                b' '
            } else {
                win_ansi_code(ch).unwrap_or(REPLACEMENT)
            }
        })
        .collect()
}
