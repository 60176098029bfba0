//! Translation of crossterm key events into [`Command`]s.

use std::collections::HashMap;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use lazy_static::lazy_static;
use maplit::hashmap;

use crate::cursor::Direction;
use crate::document::Command;
use crate::modes::hex_value;

/// Builds a `HashMap<KeyEvent, _>` from `(key CODE => ACTION)`, `('c' => ACTION)`,
/// `(shift 'C' => ACTION)` and `(ctrl 'c' => ACTION)` entries.
macro_rules! keys {
    (@acc [$($k:expr => $v:expr,)*]) => {
        hashmap![$($k => $v),*]
    };
    (@acc [$($acc:tt)*] (key $code:expr => $action:expr) $(, $($rest:tt)*)?) => {
        keys!(@acc [$($acc)*
            crossterm::event::KeyEvent::new($code, crossterm::event::KeyModifiers::NONE) => $action,
        ] $($($rest)*)?)
    };
    (@acc [$($acc:tt)*] (shift $ch:literal => $action:expr) $(, $($rest:tt)*)?) => {
        keys!(@acc [$($acc)*
            crossterm::event::KeyEvent::new(
                crossterm::event::KeyCode::Char($ch),
                crossterm::event::KeyModifiers::SHIFT,
            ) => $action,
        ] $($($rest)*)?)
    };
    (@acc [$($acc:tt)*] (ctrl $ch:literal => $action:expr) $(, $($rest:tt)*)?) => {
        keys!(@acc [$($acc)*
            crossterm::event::KeyEvent::new(
                crossterm::event::KeyCode::Char($ch),
                crossterm::event::KeyModifiers::CONTROL,
            ) => $action,
        ] $($($rest)*)?)
    };
    (@acc [$($acc:tt)*] ($ch:literal => $action:expr) $(, $($rest:tt)*)?) => {
        keys!(@acc [$($acc)*
            crossterm::event::KeyEvent::new(
                crossterm::event::KeyCode::Char($ch),
                crossterm::event::KeyModifiers::NONE,
            ) => $action,
        ] $($($rest)*)?)
    };
    ($($mappings:tt)*) => {
        keys!(@acc [] $($mappings)*)
    };
}

pub struct KeyMap<T> {
    pub maps: HashMap<KeyEvent, T>,
}

impl<T: Copy> KeyMap<T> {
    pub fn event_to_action(&self, evt: &Event) -> Option<T> {
        let key = match evt {
            Event::Key(key) => key,
            _ => return None,
        };
        if let Some(action) = self.maps.get(key) {
            return Some(*action);
        }
        // Some terminals report uppercase letters without SHIFT, others with it.
        match key.code {
            KeyCode::Char(ch) if key.modifiers == KeyModifiers::NONE && ch.is_ascii_uppercase() => self
                .maps
                .get(&KeyEvent::new(key.code, KeyModifiers::SHIFT))
                .copied(),
            _ => None,
        }
    }
}

fn default_maps() -> KeyMap<Command> {
    KeyMap {
        maps: keys!(
            (key KeyCode::Left => Command::Move(Direction::Left)),
            (key KeyCode::Right => Command::Move(Direction::Right)),
            (key KeyCode::Up => Command::Move(Direction::Up)),
            (key KeyCode::Down => Command::Move(Direction::Down)),
            (key KeyCode::PageUp => Command::Move(Direction::PageUp)),
            (key KeyCode::PageDown => Command::Move(Direction::PageDown)),
            (key KeyCode::Home => Command::Move(Direction::Home)),
            (key KeyCode::End => Command::Move(Direction::End)),
            (key KeyCode::Enter => Command::Confirm),
            (key KeyCode::Esc => Command::Cancel),
            ('g' => Command::Goto),
            ('x' => Command::Export(1)),
            (shift 'X' => Command::Export(4)),
            ('=' => Command::Increment),
            (shift '+' => Command::Increment),
            ('+' => Command::Increment),
            ('-' => Command::Decrement),
            ('n' => Command::WriteNop),
            ('q' => Command::Quit),
            (ctrl 'c' => Command::Quit)
        ),
    }
}

lazy_static! {
    static ref DEFAULT_MAPS: KeyMap<Command> = default_maps();
}

/// Maps a key event to a command; hex digits and stray characters are
/// reported as such so a pending command can consume or cancel on them.
pub fn event_to_command(evt: &Event) -> Option<Command> {
    if let Some(command) = DEFAULT_MAPS.event_to_action(evt) {
        return Some(command);
    }
    match evt {
        Event::Key(KeyEvent {
            code: KeyCode::Char(ch),
            modifiers,
        }) if (*modifiers & !KeyModifiers::SHIFT).is_empty() => Some(match hex_value(*ch) {
            Some(_) => Command::HexDigit(*ch),
            None => Command::Other(*ch),
        }),
        Event::Key(KeyEvent { code, .. }) => match code {
            KeyCode::Backspace | KeyCode::Delete | KeyCode::Tab => Some(Command::Other('\0')),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(
            event_to_command(&key(KeyCode::PageDown, KeyModifiers::NONE)),
            Some(Command::Move(Direction::PageDown))
        );
        assert_eq!(
            event_to_command(&key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Command::Cancel)
        );
    }

    #[test]
    fn export_four_with_or_without_shift_flag() {
        for modifiers in [KeyModifiers::NONE, KeyModifiers::SHIFT] {
            assert_eq!(
                event_to_command(&key(KeyCode::Char('X'), modifiers)),
                Some(Command::Export(4))
            );
        }
        assert_eq!(
            event_to_command(&key(KeyCode::Char('x'), KeyModifiers::NONE)),
            Some(Command::Export(1))
        );
    }

    #[test]
    fn digits_and_other_characters() {
        assert_eq!(
            event_to_command(&key(KeyCode::Char('c'), KeyModifiers::NONE)),
            Some(Command::HexDigit('c'))
        );
        assert_eq!(
            event_to_command(&key(KeyCode::Char('z'), KeyModifiers::NONE)),
            Some(Command::Other('z'))
        );
        assert_eq!(
            event_to_command(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(
            event_to_command(&key(KeyCode::Char('v'), KeyModifiers::ALT)),
            None
        );
    }
}
