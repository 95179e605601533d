//! The navigation signal.
//!
//! A choice handler that wants to send the player elsewhere returns
//! `Err(Unwind::Navigate(..))`. Every frame between the raise point and the
//! controller propagates it with `?`, so nothing after the raise runs, no
//! matter how deep the menu nesting. The controller then splits the signal
//! from genuine failures: signals become a [`LocationExit`], faults become an
//! [`EngineError`]. Neither error type can carry a signal.
//!
//! Because the signal is a return value, only one can be in flight per call
//! chain.
//!
//! [`LocationExit`]: crate::controller::LocationExit

use crate::controller::EngineError;
use crate::location::LocationId;
use std::io;

/// Where a navigation signal sends the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Location(LocationId),
    /// End the session.
    Terminate,
}

/// Why a handler stopped early.
#[derive(Debug)]
pub enum Unwind {
    /// Intentional control transfer.
    Navigate(Destination),
    /// Something actually broke.
    Fault(EngineError),
}

/// Result of any step inside a location handler.
pub type Flow<T> = Result<T, Unwind>;

/// Raise a navigation signal to `destination`.
pub fn go_to<T>(destination: LocationId) -> Flow<T> {
    Err(Unwind::Navigate(Destination::Location(destination)))
}

/// Raise a navigation signal that ends the session.
pub fn terminate<T>() -> Flow<T> {
    Err(Unwind::Navigate(Destination::Terminate))
}

impl Unwind {
    /// A handler failure attributed to `location`.
    pub fn fault(location: LocationId, message: impl Into<String>) -> Self {
        Unwind::Fault(EngineError::Handler {
            location,
            message: message.into(),
        })
    }
}

impl From<EngineError> for Unwind {
    fn from(err: EngineError) -> Self {
        Unwind::Fault(err)
    }
}

impl From<io::Error> for Unwind {
    fn from(err: io::Error) -> Self {
        Unwind::Fault(EngineError::Io(err))
    }
}

/// A flow with the signal separated from the failure channel.
#[derive(Debug, PartialEq, Eq)]
pub enum Settled<T> {
    Continue(T),
    Navigate(Destination),
}

/// Split a finished flow: signals become `Settled::Navigate`, faults become
/// the error.
pub fn settle<T>(flow: Flow<T>) -> Result<Settled<T>, EngineError> {
    match flow {
        Ok(value) => Ok(Settled::Continue(value)),
        Err(Unwind::Navigate(destination)) => Ok(Settled::Navigate(destination)),
        Err(Unwind::Fault(err)) => Err(err),
    }
}
