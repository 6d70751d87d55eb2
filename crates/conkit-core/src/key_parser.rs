//! State machine-based key parser for handling raw terminal input.
//!
//! The parser keeps state between calls so that escape sequences and UTF-8
//! characters split across reads are decoded correctly.

use crate::key::{Key, KeyEvent};
use crate::sequence_matcher::{MatchResult, SequenceMatcher};

/// Maximum buffer size to prevent unbounded memory growth
const MAX_BUFFER_SIZE: usize = 1024;

/// Parser state for handling different types of input sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Plain input and known single-byte sequences
    Normal,
    /// After ESC (0x1B)
    EscapeSequence,
    /// After ESC[
    CsiSequence,
    /// Inside a multi-byte UTF-8 character; holds the total encoded length
    Utf8 { expected: usize },
}

/// State machine parser for converting raw terminal input bytes to key events
pub struct KeyParser {
    state: ParserState,
    /// Bytes of the sequence or character being accumulated
    buffer: Vec<u8>,
    sequence_matcher: SequenceMatcher,
}

impl KeyParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Normal,
            buffer: Vec::new(),
            sequence_matcher: SequenceMatcher::new(),
        }
    }

    /// Current parser state
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Whether a partial sequence is buffered
    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Feed raw bytes to the parser and return any complete key events.
    ///
    /// Partial sequences are buffered until a later call completes them or
    /// [`flush`](Self::flush) gives up on them.
    pub fn feed(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        let mut events = Vec::new();

        for &byte in data {
            if self.buffer.len() >= MAX_BUFFER_SIZE {
                events.push(KeyEvent::simple(Key::NotDefined));
                self.reset();
            }

            match self.state {
                ParserState::Normal => self.handle_normal_byte(byte, &mut events),
                ParserState::EscapeSequence => self.handle_escape_byte(byte, &mut events),
                ParserState::CsiSequence => self.handle_csi_byte(byte, &mut events),
                ParserState::Utf8 { expected } => {
                    self.handle_utf8_byte(byte, expected, &mut events)
                }
            }
        }

        events
    }

    /// Flush any incomplete sequence.
    ///
    /// Called when no more bytes are immediately available, so a lone ESC is
    /// reported as [`Key::Escape`].
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::new();

        if !self.buffer.is_empty() {
            match self.state {
                ParserState::Utf8 { .. } => events.push(KeyEvent::simple(Key::NotDefined)),
                _ => {
                    let consumed = match self.sequence_matcher.find_longest_match(&self.buffer) {
                        Some(longest) => {
                            events.push(KeyEvent::simple(longest.key));
                            longest.consumed_bytes
                        }
                        None => 0,
                    };
                    for &byte in &self.buffer[consumed..] {
                        events.push(Self::create_char_event(byte));
                    }
                }
            }
        }

        self.reset();
        events
    }

    /// Reset the parser state and clear all buffers
    pub fn reset(&mut self) {
        self.state = ParserState::Normal;
        self.buffer.clear();
    }

    fn handle_normal_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        if byte == 0x1b {
            self.buffer.push(byte);
            self.state = ParserState::EscapeSequence;
            return;
        }

        if let Some(expected) = utf8_sequence_len(byte) {
            self.buffer.push(byte);
            self.state = ParserState::Utf8 { expected };
            return;
        }

        match self.sequence_matcher.match_sequence(&[byte]) {
            MatchResult::Exact(key) => events.push(KeyEvent::simple(key)),
            _ => events.push(Self::create_char_event(byte)),
        }
    }

    fn handle_escape_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        self.buffer.push(byte);

        if byte == b'[' {
            self.state = ParserState::CsiSequence;
            return;
        }

        match self.sequence_matcher.match_sequence(&self.buffer) {
            MatchResult::Exact(key) => {
                events.push(KeyEvent::simple(key));
                self.reset();
            }
            MatchResult::Prefix => {}
            MatchResult::NoMatch => {
                // Not a sequence we know: the ESC stands alone
                events.push(KeyEvent::simple(Key::Escape));
                self.reset();
                self.handle_normal_byte(byte, events);
            }
        }
    }

    fn handle_csi_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        self.buffer.push(byte);

        match self.sequence_matcher.match_sequence(&self.buffer) {
            MatchResult::Exact(key) => {
                events.push(KeyEvent::simple(key));
                self.reset();
            }
            MatchResult::Prefix => {}
            MatchResult::NoMatch => {
                if is_csi_parameter_byte(byte) {
                    // Parameterized sequence we may not know; wait for the final byte
                } else if is_csi_final_byte(byte) {
                    events.push(KeyEvent::simple(Key::NotDefined));
                    self.reset();
                } else {
                    events.push(KeyEvent::simple(Key::Escape));
                    events.push(KeyEvent::char('['));
                    let remaining: Vec<u8> = self.buffer[2..].to_vec();
                    self.reset();
                    for b in remaining {
                        self.handle_normal_byte(b, events);
                    }
                }
            }
        }
    }

    fn handle_utf8_byte(&mut self, byte: u8, expected: usize, events: &mut Vec<KeyEvent>) {
        if !(0x80..=0xbf).contains(&byte) {
            // Truncated character; drop it and start over with this byte
            events.push(KeyEvent::simple(Key::NotDefined));
            self.reset();
            self.handle_normal_byte(byte, events);
            return;
        }

        self.buffer.push(byte);
        if self.buffer.len() < expected {
            return;
        }

        let event = std::str::from_utf8(&self.buffer)
            .ok()
            .and_then(|s| s.chars().next())
            .map(KeyEvent::char)
            .unwrap_or_else(|| KeyEvent::simple(Key::NotDefined));
        events.push(event);
        self.reset();
    }

    fn create_char_event(byte: u8) -> KeyEvent {
        match byte {
            b' ' => KeyEvent::simple(Key::Space),
            0x21..=0x7e => KeyEvent::char(byte as char),
            _ => KeyEvent::simple(Key::NotDefined),
        }
    }
}

impl Default for KeyParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Total encoded length for a UTF-8 lead byte of a multi-byte character
fn utf8_sequence_len(byte: u8) -> Option<usize> {
    match byte {
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}

/// CSI parameter bytes (digits, separators and private markers)
fn is_csi_parameter_byte(byte: u8) -> bool {
    matches!(byte, b'0'..=b'9' | b';' | b':' | b'<' | b'=' | b'>' | b'?')
}

fn is_csi_final_byte(byte: u8) -> bool {
    matches!(byte, b'@'..=b'~')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(events: &[KeyEvent]) -> Vec<Key> {
        events.iter().map(|e| e.key).collect()
    }

    #[test]
    fn test_parser_creation() {
        let parser = KeyParser::new();
        assert_eq!(parser.state(), ParserState::Normal);
        assert!(!parser.has_pending());
    }

    #[test]
    fn test_simple_control_characters() {
        let mut parser = KeyParser::new();

        let events = parser.feed(&[0x03]);
        assert_eq!(keys(&events), vec![Key::ControlC]);

        let events = parser.feed(&[0x09, 0x0d, 0x7f, 0x08]);
        assert_eq!(
            keys(&events),
            vec![Key::Tab, Key::Enter, Key::Backspace, Key::Backspace]
        );
    }

    #[test]
    fn test_printable_characters() {
        let mut parser = KeyParser::new();

        let events = parser.feed(b"hi there");
        let chars: Vec<Option<char>> = events.iter().map(|e| e.printable()).collect();
        let expected: Vec<Option<char>> = "hi there".chars().map(Some).collect();
        assert_eq!(chars, expected);
        assert_eq!(events[2].key, Key::Space);
    }

    #[test]
    fn test_escape_key() {
        let mut parser = KeyParser::new();

        let events = parser.feed(&[0x1b]);
        assert!(events.is_empty());
        assert_eq!(parser.state(), ParserState::EscapeSequence);

        let events = parser.flush();
        assert_eq!(keys(&events), vec![Key::Escape]);
        assert_eq!(parser.state(), ParserState::Normal);
    }

    #[test]
    fn test_arrow_keys_incremental() {
        let mut parser = KeyParser::new();

        assert!(parser.feed(&[0x1b]).is_empty());
        assert!(parser.feed(&[0x5b]).is_empty());
        assert_eq!(parser.state(), ParserState::CsiSequence);

        let events = parser.feed(&[0x41]);
        assert_eq!(keys(&events), vec![Key::Up]);
        assert_eq!(parser.state(), ParserState::Normal);

        let events = parser.feed(b"\x1bOD");
        assert_eq!(keys(&events), vec![Key::Left]);
    }

    #[test]
    fn test_function_and_editing_keys() {
        let mut parser = KeyParser::new();

        let events = parser.feed(b"\x1bOP\x1b[15~\x1b[3~\x1b[H\x1b[4~");
        assert_eq!(
            keys(&events),
            vec![Key::F1, Key::F5, Key::Delete, Key::Home, Key::End]
        );
    }

    #[test]
    fn test_invalid_escape_sequence() {
        let mut parser = KeyParser::new();

        let events = parser.feed(&[0x1b, b'x']);
        assert_eq!(events, vec![KeyEvent::simple(Key::Escape), KeyEvent::char('x')]);
        assert_eq!(parser.state(), ParserState::Normal);
    }

    #[test]
    fn test_unknown_csi_sequence() {
        let mut parser = KeyParser::new();

        let events = parser.feed(b"\x1b[999z");
        assert_eq!(keys(&events), vec![Key::NotDefined]);
        assert_eq!(parser.state(), ParserState::Normal);
    }

    #[test]
    fn test_utf8_characters() {
        let mut parser = KeyParser::new();

        let events = parser.feed("é→".as_bytes());
        assert_eq!(events, vec![KeyEvent::char('é'), KeyEvent::char('→')]);
    }

    #[test]
    fn test_utf8_split_across_feeds() {
        let mut parser = KeyParser::new();
        let bytes = "ж".as_bytes();

        assert!(parser.feed(&bytes[..1]).is_empty());
        assert_eq!(parser.state(), ParserState::Utf8 { expected: 2 });
        assert_eq!(parser.feed(&bytes[1..]), vec![KeyEvent::char('ж')]);
    }

    #[test]
    fn test_truncated_utf8() {
        let mut parser = KeyParser::new();

        let events = parser.feed(&[0xe2, b'a']);
        assert_eq!(events, vec![KeyEvent::simple(Key::NotDefined), KeyEvent::char('a')]);
    }

    #[test]
    fn test_flush_partial_sequences() {
        let mut parser = KeyParser::new();

        parser.feed(&[0x1b, 0x5b, 0x31]);
        assert_eq!(parser.state(), ParserState::CsiSequence);

        let events = parser.flush();
        assert_eq!(events[0].key, Key::Escape);
        assert_eq!(events[1], KeyEvent::char('['));
        assert_eq!(events[2], KeyEvent::char('1'));
        assert!(!parser.has_pending());
    }

    #[test]
    fn test_buffer_overflow_protection() {
        let mut parser = KeyParser::new();

        let mut long_input = vec![0x1b, 0x5b];
        long_input.extend(vec![0x30; MAX_BUFFER_SIZE]);

        let events = parser.feed(&long_input);
        assert!(!events.is_empty());
        assert!(parser.buffer.len() < MAX_BUFFER_SIZE);
    }

    #[test]
    fn test_multiple_sequences_in_one_feed() {
        let mut parser = KeyParser::new();

        let events = parser.feed(b"\x03\x1b[A\x1b[Ba\x04");
        assert_eq!(
            keys(&events),
            vec![Key::ControlC, Key::Up, Key::Down, Key::Char, Key::ControlD]
        );
    }
}
