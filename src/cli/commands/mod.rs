pub mod bulk;
mod command_result;
pub mod compile;
pub mod generate;
pub mod hardcoded;
pub mod helper;
pub mod init;
pub mod matching;
pub mod parity;
pub mod status;
pub mod write;

pub use command_result::*;
