//! Raw terminal bytes → logical key events.
//!
//! The transport delivers whatever the client sent in one read, so a chunk may
//! hold several keystrokes or only part of a cursor sequence.  Decoding is a
//! pure function of the chunk; the driver uses [`needs_more`] to decide
//! whether to wait briefly for the tail of a split sequence first.

pub const ESC: u8 = 0x1b;

/// One logical keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// A bare escape not followed by a cursor sequence.
    Escape,
    /// Any other byte, passed through literally.
    Byte(u8),
}

impl Key {
    pub fn is_enter(self) -> bool {
        matches!(self, Key::Byte(b'\r' | b'\n'))
    }

    /// `Byte` matching `c` in either case.
    pub fn is_char(self, c: u8) -> bool {
        matches!(self, Key::Byte(b) if b.eq_ignore_ascii_case(&c))
    }

    pub fn is_quit(self) -> bool {
        self.is_char(b'q')
    }

    pub fn is_back(self) -> bool {
        matches!(self, Key::Escape | Key::Left)
    }
}

fn cursor_key(final_byte: u8) -> Option<Key> {
    match final_byte {
        b'A' => Some(Key::Up),
        b'B' => Some(Key::Down),
        b'C' => Some(Key::Right),
        b'D' => Some(Key::Left),
        _ => None,
    }
}

/// Decode a chunk into keys.  Never fails.
pub fn decode(raw: &[u8]) -> Vec<Key> {
    let mut keys = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == ESC {
            if let (Some(b'['), Some(key)) = (raw.get(i + 1), raw.get(i + 2).and_then(|b| cursor_key(*b))) {
                keys.push(key);
                i += 3;
                continue;
            }
            keys.push(Key::Escape);
        } else {
            keys.push(Key::Byte(raw[i]));
        }
        i += 1;
    }
    keys
}

/// True when `raw` ends in an incomplete cursor sequence (`ESC` or `ESC [`)
/// that a few more bytes could complete.
pub fn needs_more(raw: &[u8]) -> bool {
    match raw {
        [.., ESC] => true,
        [.., ESC, b'['] => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_triplets_collapse() {
        assert_eq!(
            decode(b"\x1b[A\x1b[B\x1b[C\x1b[D"),
            vec![Key::Up, Key::Down, Key::Right, Key::Left]
        );
    }

    #[test]
    fn lone_escape_is_escape() {
        assert_eq!(decode(b"\x1b"), vec![Key::Escape]);
        assert_eq!(decode(b"\x1bq"), vec![Key::Escape, Key::Byte(b'q')]);
    }

    #[test]
    fn unknown_csi_falls_back_to_literals() {
        // Home key: ESC [ H, not a cursor arrow.
        assert_eq!(
            decode(b"\x1b[H"),
            vec![Key::Escape, Key::Byte(b'['), Key::Byte(b'H')]
        );
    }

    #[test]
    fn mixed_chunk_keeps_order() {
        assert_eq!(
            decode(b"1\x1b[Bt\r"),
            vec![Key::Byte(b'1'), Key::Down, Key::Byte(b't'), Key::Byte(b'\r')]
        );
    }

    #[test]
    fn high_bytes_pass_through() {
        assert_eq!(decode(&[0xff, 0x00]), vec![Key::Byte(0xff), Key::Byte(0x00)]);
    }

    #[test]
    fn incomplete_prefix_detection() {
        assert!(needs_more(b"\x1b"));
        assert!(needs_more(b"x\x1b["));
        assert!(!needs_more(b"\x1b[A"));
        assert!(!needs_more(b"["));
        assert!(!needs_more(b""));
    }

    #[test]
    fn every_split_of_a_triplet_rejoins_to_one_key() {
        for seq in [b"\x1b[A", b"\x1b[B", b"\x1b[C", b"\x1b[D"] {
            for cut in 1..seq.len() {
                let (head, tail) = seq.split_at(cut);
                assert!(needs_more(head), "prefix {head:?} should wait");
                let mut joined = head.to_vec();
                joined.extend_from_slice(tail);
                assert_eq!(decode(&joined).len(), 1);
            }
        }
    }

    #[test]
    fn key_helpers() {
        assert!(Key::Byte(b'Q').is_quit());
        assert!(Key::Byte(b'\n').is_enter());
        assert!(Key::Left.is_back());
        assert!(!Key::Byte(b'x').is_char(b't'));
    }
}
