use cpsed_class_file::ClassFileError;
use thiserror::Error;
use zip::result::ZipError;

#[derive(Debug, Error)]
pub enum JarError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    ZipError(#[from] ZipError),
    #[error(transparent)]
    ClassFileError(#[from] ClassFileError),
    #[error("{name}: {source}")]
    Member {
        name: String,
        #[source]
        source: ClassFileError,
    },
}
