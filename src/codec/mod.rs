//! Lossless text codec for Juman++ and KNP sentence blocks.

mod comment;
mod emit;
mod lines;
mod parse;

pub use comment::SidFormat;
pub use lines::{EOD, EOS};

pub(crate) use comment::{format_comment, parse_comment};
pub(crate) use emit::{emit_jumanpp, emit_knp, emit_raw_text};
pub(crate) use lines::is_comment_line;
pub(crate) use parse::{parse_jumanpp, parse_knp, parse_raw_text};
