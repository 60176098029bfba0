use tracing::debug;

use super::{hex_value, CommandMode, HexDigits};
use crate::byte_buffer::ByteBuffer;
use crate::cursor::NavigationCursor;
use crate::error::{Error, Result};

/// What a digit did to the pending command.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InputOutcome {
    /// Digit stored, command still pending.
    Pending,
    /// Byte written at this offset.
    Committed(usize),
    /// Cursor moved to this offset, possibly clamped to the last byte.
    Jumped(usize),
    /// Goto target lies on a page past the end; nothing moved.
    JumpIgnored(usize),
    /// No command was active and the buffer cannot be edited.
    Ignored,
}

/// Accumulates hex digits for a byte edit or a goto.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CommandInput {
    mode: CommandMode,
    digits: HexDigits,
}

impl Default for CommandInput {
    fn default() -> Self {
        CommandInput::new()
    }
}

impl CommandInput {
    pub fn new() -> CommandInput {
        CommandInput {
            mode: CommandMode::None,
            digits: HexDigits::new(),
        }
    }

    pub fn mode(&self) -> CommandMode {
        self.mode
    }

    pub fn digits(&self) -> &HexDigits {
        &self.digits
    }

    pub fn is_pending(&self) -> bool {
        self.mode != CommandMode::None
    }

    pub fn begin_goto(&mut self) {
        self.mode = CommandMode::GotoInput;
        self.digits.clear();
    }

    pub fn cancel(&mut self) {
        self.mode = CommandMode::None;
        self.digits.clear();
    }

    /// Feeds one character. A non-hex character cancels whatever was pending.
    ///
    /// With no command pending, a digit on a writable buffer starts a byte
    /// edit. The first digit of a byte edit is the low nibble and the second
    /// the high nibble; goto digits fill from the most significant slot down.
    pub fn push(
        &mut self,
        ch: char,
        buffer: &mut ByteBuffer,
        cursor: &mut NavigationCursor,
    ) -> Result<InputOutcome> {
        let nibble = match hex_value(ch) {
            Some(nibble) => nibble,
            None => {
                self.cancel();
                return Err(Error::InvalidCommandInput(ch));
            }
        };

        if self.mode == CommandMode::None {
            if buffer.is_read_only() {
                return Ok(InputOutcome::Ignored);
            }
            self.mode = CommandMode::ByteInput;
        }

        match self.mode {
            CommandMode::ByteInput => self.push_byte_digit(nibble, buffer, cursor),
            CommandMode::GotoInput => Ok(self.push_goto_digit(nibble, buffer.size(), cursor)),
            CommandMode::None => Ok(InputOutcome::Ignored),
        }
    }

    fn push_byte_digit(
        &mut self,
        nibble: u8,
        buffer: &mut ByteBuffer,
        cursor: &NavigationCursor,
    ) -> Result<InputOutcome> {
        let low = match self.digits.get(0) {
            Some(low) => low,
            None => {
                self.digits.set(0, nibble);
                return Ok(InputOutcome::Pending);
            }
        };
        let value = (nibble << 4) | low;
        let offset = cursor.absolute();
        self.cancel();
        buffer.set(offset, value)?;
        debug!(offset, value, "byte written");
        Ok(InputOutcome::Committed(offset))
    }

    fn push_goto_digit(
        &mut self,
        nibble: u8,
        size: usize,
        cursor: &mut NavigationCursor,
    ) -> InputOutcome {
        match self.digits.next_from_top() {
            Some(0) => {
                self.digits.set(0, nibble);
                self.jump(size, cursor)
            }
            Some(slot) => {
                self.digits.set(slot, nibble);
                InputOutcome::Pending
            }
            None => self.jump(size, cursor),
        }
    }

    /// Finishes a pending goto with the digits typed so far; resets in every mode.
    pub fn confirm(&mut self, size: usize, cursor: &mut NavigationCursor) -> Option<InputOutcome> {
        if self.mode == CommandMode::GotoInput {
            Some(self.jump(size, cursor))
        } else {
            self.cancel();
            None
        }
    }

    fn jump(&mut self, size: usize, cursor: &mut NavigationCursor) -> InputOutcome {
        let offset = self.digits.value();
        self.cancel();
        if cursor.goto_absolute(offset, size) {
            debug!(offset, landed = cursor.absolute(), "goto");
            InputOutcome::Jumped(cursor.absolute())
        } else {
            debug!(offset, size, "goto target outside buffer");
            InputOutcome::JumpIgnored(offset)
        }
    }
}
