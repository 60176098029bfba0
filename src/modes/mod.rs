//! Multi-key commands: typing a byte value or a goto offset digit by digit.

pub mod input;

pub use input::{CommandInput, InputOutcome};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CommandMode {
    None,
    ByteInput,
    GotoInput,
}

impl CommandMode {
    /// Prompt shown in the info bar while the mode collects digits.
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            CommandMode::None => None,
            CommandMode::ByteInput => Some("&"),
            CommandMode::GotoInput => Some(">"),
        }
    }
}

pub const DIGIT_SLOTS: usize = 4;

/// Value of an ASCII hex digit; only lowercase letters are accepted.
pub fn hex_value(ch: char) -> Option<u8> {
    match ch {
        '0'..='9' | 'a'..='f' => ch.to_digit(16).map(|d| d as u8),
        _ => None,
    }
}

/// Four nibble slots; slot 0 is the least significant.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct HexDigits {
    slots: [Option<u8>; DIGIT_SLOTS],
}

impl HexDigits {
    pub fn new() -> HexDigits {
        HexDigits::default()
    }

    pub fn get(&self, slot: usize) -> Option<u8> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn set(&mut self, slot: usize, nibble: u8) {
        self.slots[slot] = Some(nibble & 0xf);
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest empty slot, the one the next goto digit goes into.
    pub fn next_from_top(&self) -> Option<usize> {
        (0..DIGIT_SLOTS).rev().find(|&i| self.slots[i].is_none())
    }

    /// Slots assembled into a number, empty slots counting as zero.
    pub fn value(&self) -> usize {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, nibble)| (nibble.unwrap_or(0) as usize) << (4 * i))
            .sum()
    }

    /// Filled slots, most significant first, as lowercase characters.
    pub fn to_prompt(&self) -> String {
        self.slots
            .iter()
            .rev()
            .flatten()
            .map(|&n| char::from_digit(n as u32, 16).unwrap_or('?'))
            .collect()
    }

    pub fn clear(&mut self) {
        self.slots = [None; DIGIT_SLOTS];
    }
}
