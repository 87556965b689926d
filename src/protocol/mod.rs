//! Frame-driver protocol handling.
//!
//! A line-oriented command protocol over stdin/stdout: the command parser
//! for the main loop and the text renderings used in responses.

pub mod parser;
pub mod render;

pub use parser::{parse_command, Command, Operand};
pub use render::{board_lines, status_lines, tool_line};
