//! Editing primitives shared by the template editor: the caret-aware text
//! buffer, the cancellation tokens behind debounced work and the session
//! that decides when to look up schemas and extract placeholders.

mod buffer;
mod debounce;
mod session;

pub use buffer::{byte_to_utf16_idx, utf16_len, utf16_to_byte_idx, EditorBuffer, Selection};
pub use debounce::{DebounceGate, DebounceTicket};
pub use session::{EditorSession, Effect};
