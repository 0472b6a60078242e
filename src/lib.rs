//! Live quote-to-backtick conversion for template interpolation.
//!
//! When `${...}` interpolation appears inside an ordinary quoted string, the
//! string's delimiters are swapped for backticks; when the last
//! interpolation is deleted again the backticks revert to quotes. Markup
//! attribute values get the matching brace treatment.
//!
//! The crate is host-agnostic: an editor integration feeds
//! [`dispatch::ChangeDispatcher`] one [`dispatch::EditEvent`] per change
//! against any [`buffer::TextBufferMut`], and moves the cursor to wherever
//! the returned [`dispatch::Outcome`] says. The [`scanner`] module is the
//! batch counterpart used by the CLI.

pub mod buffer;
pub mod cli;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod interpolation;
pub mod markup;
pub mod position;
pub mod quote;
pub mod rewrite;
pub mod scanner;
pub mod snapshot;
pub mod tracing;
pub(crate) mod util;

pub use buffer::{Replacement, RopeBuffer, TextBuffer, TextBufferMut};
pub use config::{ConverterConfig, QuoteType};
pub use dispatch::{ChangeDispatcher, DocumentMeta, EditEvent, Outcome};
pub use position::Position;
