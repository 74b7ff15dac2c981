//! Shared model and host-independent logic for the template editor.
//!
//! Everything in here compiles natively and is exercised by plain unit tests;
//! the browser client only wires these types to the DOM and the network.

pub mod api;
pub mod editor;
pub mod hub;
pub mod model;
pub mod placeholder;
pub mod requests;
