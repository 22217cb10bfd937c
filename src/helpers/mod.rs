//! Helper functions shared by the renderer, templates and server

mod html;
mod url;

pub use html::*;
pub use url::*;
