mod command;

pub use command::{CopyCommand, QuoteStyle};
