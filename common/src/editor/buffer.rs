//! Text buffer with a remembered caret.
//!
//! Browser textareas report `selectionStart` / `selectionEnd` in UTF-16 code
//! units while Rust strings are indexed by UTF-8 bytes. The buffer stores the
//! selection the way the browser reports it and converts only at the moment
//! it edits the text, so a caret captured before focus moves to the
//! placeholder list can be restored verbatim afterwards.

/// Selection inside the buffer, in UTF-16 code units, `start <= end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: u32,
    pub end: u32,
}

impl Selection {
    pub fn caret(pos: u32) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorBuffer {
    text: String,
    selection: Selection,
}

impl EditorBuffer {
    /// New buffer with the caret at the end of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = utf16_len(&text);
        Self {
            text,
            selection: Selection::caret(end),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Replaces the content (user typed, or a template was loaded). The
    /// selection is clamped to the new length.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        let Selection { start, end } = self.selection;
        self.set_selection(start, end);
    }

    /// Records the caret as reported by the host control. Out of range
    /// positions are clamped and a reversed range is put in order.
    pub fn set_selection(&mut self, start: u32, end: u32) {
        let len = utf16_len(&self.text);
        let (start, end) = (start.min(len), end.min(len));
        self.selection = Selection {
            start: start.min(end),
            end: start.max(end),
        };
    }

    /// Replaces the remembered selection with `token` and returns the new
    /// caret, `start + utf16_len(token)`.
    pub fn insert(&mut self, token: &str) -> u32 {
        let Selection { start, end } = self.selection;
        let start_byte = utf16_to_byte_idx(&self.text, start as usize);
        let end_byte = utf16_to_byte_idx(&self.text, end as usize);
        self.text.replace_range(start_byte..end_byte, token);

        let caret = byte_to_utf16_idx(&self.text, start_byte + token.len());
        self.selection = Selection::caret(caret);
        caret
    }
}

/// Length of `s` in UTF-16 code units.
pub fn utf16_len(s: &str) -> u32 {
    s.encode_utf16().count() as u32
}

/// Converts a UTF-8 byte index to the matching UTF-16 code unit index.
/// `byte_idx` must sit on a char boundary.
pub fn byte_to_utf16_idx(s: &str, byte_idx: usize) -> u32 {
    utf16_len(&s[..byte_idx.min(s.len())])
}

/// Converts a UTF-16 code unit index to a UTF-8 byte index.
///
/// A position that falls between the two halves of a surrogate pair moves
/// forward past the whole character, so the result is always a char
/// boundary. Positions past the end map to `s.len()`.
pub fn utf16_to_byte_idx(s: &str, utf16_idx: usize) -> usize {
    let mut units = 0;
    for (byte_idx, ch) in s.char_indices() {
        if units >= utf16_idx {
            return byte_idx;
        }
        units += ch.len_utf16();
    }
    s.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_at_caret_and_advances_it() {
        let mut buffer = EditorBuffer::new("hello world");
        buffer.set_selection(5, 5);
        let caret = buffer.insert("{{X}}");
        assert_eq!(buffer.text(), "hello{{X}} world");
        assert_eq!(caret, 10);
        assert_eq!(buffer.selection(), Selection::caret(10));
    }

    #[test]
    fn replaces_selected_range() {
        let mut buffer = EditorBuffer::new("Estimado NOMBRE:");
        buffer.set_selection(9, 15);
        let caret = buffer.insert("{{Customer.Name}}");
        assert_eq!(buffer.text(), "Estimado {{Customer.Name}}:");
        assert_eq!(caret, 9 + 17);
    }

    #[test]
    fn reversed_and_out_of_range_selection_is_normalized() {
        let mut buffer = EditorBuffer::new("abc");
        buffer.set_selection(40, 1);
        assert_eq!(buffer.selection(), Selection { start: 1, end: 3 });
    }

    #[test]
    fn new_buffer_caret_sits_at_end() {
        let buffer = EditorBuffer::new("Đơn");
        assert_eq!(buffer.selection(), Selection::caret(3));
        assert!(buffer.selection().is_collapsed());
    }

    #[test]
    fn multibyte_text_uses_utf16_positions() {
        // "Nº " is 3 UTF-16 units but 4 bytes.
        let mut buffer = EditorBuffer::new("Nº fin");
        buffer.set_selection(3, 3);
        let caret = buffer.insert("{{Contract.Number}}");
        assert_eq!(buffer.text(), "Nº {{Contract.Number}}fin");
        assert_eq!(caret, 3 + 19);
    }

    #[test]
    fn surrogate_pairs_are_never_split() {
        let text = "a😀b";
        assert_eq!(utf16_len(text), 4);
        assert_eq!(utf16_to_byte_idx(text, 1), 1);
        assert_eq!(utf16_to_byte_idx(text, 2), 5);
        assert_eq!(utf16_to_byte_idx(text, 3), 5);
        assert_eq!(utf16_to_byte_idx(text, 99), text.len());
        assert_eq!(byte_to_utf16_idx(text, 5), 3);
    }

    #[test]
    fn shrinking_text_clamps_selection() {
        let mut buffer = EditorBuffer::new("una plantilla larga");
        buffer.set_text("corta");
        assert_eq!(buffer.selection(), Selection::caret(5));
    }
}
