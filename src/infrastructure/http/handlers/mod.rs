//! HTTP Handlers

mod analyze;
mod index;
mod ping;

pub use analyze::*;
pub use index::*;
pub use ping::*;
