//! Utility modules

pub mod file_validation;
pub mod path;

pub use file_validation::{
    is_likely_binary, read_source, validate_file_for_reading, FileOpenError, MAX_FILE_SIZE,
};
pub use path::{expand_home, ExpandError};
