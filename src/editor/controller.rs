//! Per-keystroke input controller.
//!
//! [`handle_key`] decides, from the current text, cursor and key, whether a key
//! gets special bracket handling or falls through to ordinary editing. Special
//! handling only ever looks at the characters directly around the cursor; it
//! never tries to repair brackets further away.
//!
//! Cursor positions are counted in characters, not bytes.

use crate::calculator::Outcome;

/// Text of the expression input together with the cursor position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    text: String,
    cursor: usize,
}

impl InputField {
    /// Creates a field with the cursor after the last character.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    /// Creates a field with an explicit cursor, clamped to the text length.
    pub fn with_cursor(text: impl Into<String>, cursor: usize) -> Self {
        let text = text.into();
        let cursor = cursor.min(text.chars().count());
        Self { text, cursor }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Character directly after the cursor.
    fn next_char(&self) -> Option<char> {
        self.text.chars().nth(self.cursor)
    }

    /// Character directly before the cursor.
    fn prev_char(&self) -> Option<char> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.text.chars().nth(i))
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }

    fn inserted(&self, s: &str, cursor_advance: usize) -> Self {
        let at = self.byte_offset(self.cursor);
        let mut text = String::with_capacity(self.text.len() + s.len());
        text.push_str(&self.text[..at]);
        text.push_str(s);
        text.push_str(&self.text[at..]);
        Self {
            text,
            cursor: self.cursor + cursor_advance,
        }
    }

    /// Removes the characters in `start..end` and puts the cursor at `start`.
    fn removed(&self, start: usize, end: usize) -> Self {
        let from = self.byte_offset(start);
        let to = self.byte_offset(end);
        let mut text = self.text.clone();
        text.replace_range(from..to, "");
        Self { text, cursor: start }
    }

    fn moved_to(&self, cursor: usize) -> Self {
        Self::with_cursor(self.text.clone(), cursor)
    }
}

/// A key event relevant to the expression input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    /// A printable character, including `(` and `)`.
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Enter,
    Escape,
    /// The platform copy shortcut (Ctrl+C / Cmd+C).
    Copy {
        /// Whether the user has text selected in the input.
        has_selection: bool,
    },
}

/// What the controller decided for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Commit the current result to the history. Text is unchanged.
    Commit,
    /// Suppress the default copy and copy the result instead.
    CopyResult,
    /// Suppress the default behaviour and replace the field with this one.
    Edit(InputField),
    /// No special handling; apply [`apply_default`].
    PassThrough,
}

/// Decides how `key` is handled.
///
/// `outcome` is the evaluation of the current text; Enter and copy only react
/// when it holds a non-empty value.
///
/// # Examples
///
/// ```
/// use popcalc::calculator::Outcome;
/// use popcalc::editor::{handle_key, InputField, KeyAction, KeyPress};
///
/// let field = InputField::with_cursor("sqrt", 4);
/// let action = handle_key(&field, KeyPress::Char('('), &Outcome::Failure);
/// assert_eq!(action, KeyAction::Edit(InputField::with_cursor("sqrt()", 5)));
/// ```
#[must_use]
pub fn handle_key(field: &InputField, key: KeyPress, outcome: &Outcome) -> KeyAction {
    let result_ready = outcome.value().is_some();

    match key {
        KeyPress::Enter if result_ready => KeyAction::Commit,
        KeyPress::Escape => KeyAction::Edit(InputField::default()),
        KeyPress::Copy {
            has_selection: false,
        } if result_ready => KeyAction::CopyResult,
        KeyPress::Char('(') => KeyAction::Edit(field.inserted("()", 1)),
        KeyPress::Char(')') if field.next_char() == Some(')') => {
            KeyAction::Edit(field.moved_to(field.cursor + 1))
        }
        KeyPress::Backspace
            if field.prev_char() == Some('(') && field.next_char() == Some(')') =>
        {
            KeyAction::Edit(field.removed(field.cursor - 1, field.cursor + 1))
        }
        _ => KeyAction::PassThrough,
    }
}

/// Ordinary text-input behaviour for keys the controller passes through.
#[must_use]
pub fn apply_default(field: &InputField, key: KeyPress) -> InputField {
    match key {
        KeyPress::Char(c) => {
            let mut buf = [0u8; 4];
            field.inserted(c.encode_utf8(&mut buf), 1)
        }
        KeyPress::Backspace if field.cursor > 0 => field.removed(field.cursor - 1, field.cursor),
        KeyPress::Delete if field.cursor < field.len() => {
            field.removed(field.cursor, field.cursor + 1)
        }
        KeyPress::Left => field.moved_to(field.cursor.saturating_sub(1)),
        KeyPress::Right => field.moved_to(field.cursor + 1),
        KeyPress::Home => field.moved_to(0),
        KeyPress::End => field.moved_to(field.len()),
        _ => field.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> Outcome {
        Outcome::Value("3".into())
    }

    fn edit(text: &str, cursor: usize, key: KeyPress) -> InputField {
        let field = InputField::with_cursor(text, cursor);
        match handle_key(&field, key, &Outcome::Empty) {
            KeyAction::Edit(next) => next,
            KeyAction::PassThrough => apply_default(&field, key),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_open_paren_inserts_pair_at_every_position() {
        let text = "1+2*3";
        for k in 0..=text.len() {
            let next = edit(text, k, KeyPress::Char('('));
            assert_eq!(next.text(), format!("{}(){}", &text[..k], &text[k..]));
            assert_eq!(next.cursor(), k + 1);
        }
    }

    #[test]
    fn test_close_paren_skips_existing_closer() {
        let next = edit("(12)", 3, KeyPress::Char(')'));
        assert_eq!(next, InputField::with_cursor("(12)", 4));
    }

    #[test]
    fn test_close_paren_inserts_when_no_closer_follows() {
        let next = edit("(12", 3, KeyPress::Char(')'));
        assert_eq!(next, InputField::with_cursor("(12)", 4));
    }

    #[test]
    fn test_backspace_deletes_empty_pair_atomically() {
        let next = edit("sqrt()", 5, KeyPress::Backspace);
        assert_eq!(next, InputField::with_cursor("sqrt", 4));
    }

    #[test]
    fn test_backspace_restores_cursor_after_pair_insert() {
        let start = InputField::with_cursor("2*", 2);
        let KeyAction::Edit(paired) = handle_key(&start, KeyPress::Char('('), &Outcome::Empty)
        else {
            panic!("expected edit");
        };
        let KeyAction::Edit(back) = handle_key(&paired, KeyPress::Backspace, &Outcome::Empty)
        else {
            panic!("expected edit");
        };
        assert_eq!(back, start);
    }

    #[test]
    fn test_backspace_without_adjacent_pair_is_default() {
        let next = edit("(1)", 2, KeyPress::Backspace);
        assert_eq!(next, InputField::with_cursor("()", 1));
        let next = edit("()", 0, KeyPress::Backspace);
        assert_eq!(next, InputField::with_cursor("()", 0));
    }

    #[test]
    fn test_enter_commits_only_with_result() {
        let field = InputField::new("1+2");
        assert_eq!(handle_key(&field, KeyPress::Enter, &ready()), KeyAction::Commit);
        assert_eq!(
            handle_key(&field, KeyPress::Enter, &Outcome::Failure),
            KeyAction::PassThrough
        );
        assert_eq!(
            handle_key(&field, KeyPress::Enter, &Outcome::Empty),
            KeyAction::PassThrough
        );
    }

    #[test]
    fn test_escape_clears_field() {
        let field = InputField::with_cursor("1+2", 1);
        assert_eq!(
            handle_key(&field, KeyPress::Escape, &ready()),
            KeyAction::Edit(InputField::default())
        );
    }

    #[test]
    fn test_copy_intercepted_only_without_selection() {
        let field = InputField::new("1+2");
        assert_eq!(
            handle_key(&field, KeyPress::Copy { has_selection: false }, &ready()),
            KeyAction::CopyResult
        );
        assert_eq!(
            handle_key(&field, KeyPress::Copy { has_selection: true }, &ready()),
            KeyAction::PassThrough
        );
        assert_eq!(
            handle_key(&field, KeyPress::Copy { has_selection: false }, &Outcome::Failure),
            KeyAction::PassThrough
        );
    }

    #[test]
    fn test_typing_a_call_char_by_char() {
        let mut field = InputField::default();
        for c in "sqrt(16)".chars() {
            field = edit(field.text(), field.cursor(), KeyPress::Char(c));
        }
        assert_eq!(field, InputField::with_cursor("sqrt(16)", 8));
    }

    #[test]
    fn test_multibyte_text_uses_char_positions() {
        let next = edit("2×π", 2, KeyPress::Char('('));
        assert_eq!(next, InputField::with_cursor("2×()π", 3));
    }

    #[test]
    fn test_cursor_movement() {
        let field = InputField::with_cursor("abc", 1);
        assert_eq!(apply_default(&field, KeyPress::Left).cursor(), 0);
        assert_eq!(apply_default(&field, KeyPress::Right).cursor(), 2);
        assert_eq!(apply_default(&field, KeyPress::Home).cursor(), 0);
        assert_eq!(apply_default(&field, KeyPress::End).cursor(), 3);
        assert_eq!(apply_default(&field, KeyPress::Delete).text(), "ac");
        assert_eq!(
            apply_default(&InputField::with_cursor("a", 0), KeyPress::Left).cursor(),
            0
        );
    }
}
