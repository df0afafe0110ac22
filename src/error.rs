use failure::Fail;
use std::io;

#[derive(Fail, Debug)]
pub enum PoolError {
    /// The pool was shut down and no longer accepts submissions.
    #[fail(display = "pool is closed")]
    Closed,
    #[fail(display = "invalid pool configuration: {}", _0)]
    Config(String),
    #[fail(display = "{}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for PoolError {
    fn from(err: io::Error) -> PoolError {
        PoolError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, PoolError>;
