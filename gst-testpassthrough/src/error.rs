//!
//! Errors raised while setting up or driving a pipeline
//!

use crate::glib;

/// Failure to get a pipeline running.
///
/// An error posted on the bus once the pipeline runs is not a [`RunError`],
/// it is reported as [`crate::Outcome::Error`].
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to initialize GStreamer: {0}")]
    Init(#[source] glib::Error),

    #[error("failed to parse pipeline description: {0}")]
    Parse(#[source] glib::Error),

    #[error("pipeline description did not produce a pipeline")]
    NotAPipeline,

    #[error("pipeline has no bus")]
    NoBus,

    #[error("failed to acquire main context: {0}")]
    Context(#[source] glib::BoolError),

    #[error("state change failed: {0}")]
    StateChange(#[from] gst::StateChangeError),

    #[error("main loop quit without end-of-stream or error")]
    Interrupted,
}
