use crate::{Executor, Result};

/// An executor that owns a live database connection.
pub trait Connection: Executor {
    /// Open a connection from a driver specific URL (`sqlite://path?mode=rwc`).
    fn connect(url: &str) -> Result<Self>
    where
        Self: Sized;

    /// Close the connection, releasing the underlying handle.
    fn close(self) -> Result<()>
    where
        Self: Sized;
}
