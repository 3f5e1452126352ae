// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html

mod class_file;
mod constant_pool;
mod error;
mod matcher;
mod report;
mod transcoder;

pub use class_file::ClassFileHeader;
pub use constant_pool::CpTag;
pub use error::ClassFileError;
pub use matcher::{Mode, RewriteResult, Substitution};
pub use report::{Hit, MemberReport};
pub use transcoder::Transcoder;

pub type Result<T, E = ClassFileError> = std::result::Result<T, E>;
