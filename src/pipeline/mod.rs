//! Core data-flow traits.
//!
//! This module defines the seams between the audio components:
//!
//! - [`Sink`] - Passive receiver that accepts pushed data
//! - [`Source`] - Passive producer that returns data when pulled
//! - [`Node`] - A processing unit that transforms input data to output data
//!
//! Ingestion is push-driven (the device callback pushes into a [`Sink`]);
//! egress is pull-driven (the publish loop pulls from a [`Source`] on a
//! fixed interval). A `Source` returning `None` means "no data right now"
//! and is a normal condition, not an error.

/// Passive receiver - can receive pushed data.
///
/// When data is pushed, the implementation decides what to do with it:
/// process and forward, or store in a buffer (e.g.
/// [`JitterBuffer`](crate::audio::JitterBuffer)).
pub trait Sink: Send + Sync {
    type Input;

    fn push(&self, input: Self::Input);
}

/// Passive producer - can return data when pulled.
///
/// Pulling never blocks; an empty producer returns `None`.
pub trait Source: Send + Sync {
    type Output;

    fn pull(&self) -> Option<Self::Output>;
}

/// A processing node that transforms input to output.
///
/// Returns `None` if the node is accumulating data and not ready to emit
/// output yet.
pub trait Node: Send + Sync {
    type Input;
    type Output;

    fn process(&self, input: Self::Input) -> Option<Self::Output>;
}
