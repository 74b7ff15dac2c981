//! Utility functions for the template editor.
//!
//! - **Caret capture/restore**: read the textarea selection before focus
//!   moves to the placeholder panel and put it back after an insertion.
//! - **Dirty tracking**: MD5 of the text, compared against the loaded copy.

use gloo_timers::callback::Timeout;
use web_sys::HtmlTextAreaElement;
use yew::NodeRef;

/// Selection of a textarea in UTF-16 code units, `(start, end)`.
pub fn read_selection(textarea: &HtmlTextAreaElement) -> (u32, u32) {
    let start = textarea.selection_start().ok().flatten().unwrap_or(0);
    let end = textarea.selection_end().ok().flatten().unwrap_or(start);
    (start, end)
}

/// Writes `text` into the textarea, focuses it and collapses the selection
/// at `caret`. Applied again right after the next render because Yew resets
/// the value of a controlled textarea.
pub fn restore_caret(textarea_ref: &NodeRef, text: &str, caret: u32) {
    if let Some(textarea) = textarea_ref.cast::<HtmlTextAreaElement>() {
        textarea.set_value(text);
        place_caret(&textarea, caret);
    }
    let textarea_ref = textarea_ref.clone();
    Timeout::new(10, move || {
        if let Some(textarea) = textarea_ref.cast::<HtmlTextAreaElement>() {
            place_caret(&textarea, caret);
        }
    })
    .forget();
}

fn place_caret(textarea: &HtmlTextAreaElement, caret: u32) {
    textarea.focus().ok();
    textarea.set_selection_range(caret, caret).ok();
}

/// Hex MD5 digest of `input`.
pub fn compute_md5(input: &str) -> String {
    format!("{:x}", md5::compute(input))
}
