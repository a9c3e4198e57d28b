//! File system input and output.

pub mod reader;
pub mod writer;

pub use reader::{InputStatistics, OpenedInput, check_input_path, open_input, open_inputs};
pub use writer::{BlobWriter, WriteOptions, WriteStatistics};
