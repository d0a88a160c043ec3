//!
//! Terminal bus messages of a pipeline run
//!

use std::fmt;

use gst::prelude::*;

use crate::glib;

/// Error message posted on the pipeline bus
#[derive(Debug)]
pub struct BusError {
    /// Path of the object that posted the message
    pub source: Option<String>,
    pub error: glib::Error,
    pub debug: Option<String>,
}

impl BusError {
    pub fn from_message(err: &gst::message::Error) -> Self {
        Self {
            source: err.src().map(|s| s.path_string().to_string()),
            error: err.error(),
            debug: err.debug().map(|d| d.to_string()),
        }
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error from {}: {}",
            self.source.as_deref().unwrap_or("<unknown>"),
            self.error
        )?;

        if let Some(debug) = &self.debug {
            write!(f, " ({debug})")?;
        }

        Ok(())
    }
}

/// How a pipeline run ended
#[derive(Debug)]
pub enum Outcome {
    /// End-of-stream reached the pipeline.
    ///
    /// `buffers` counts the buffers that left the probed element, `None` when
    /// the pipeline had no such element.
    Eos { buffers: Option<u64> },

    Error(BusError),
}

impl Outcome {
    /// Classifies `msg`, `None` for anything that does not end a run
    pub fn from_message(msg: &gst::MessageRef, buffers: Option<u64>) -> Option<Self> {
        use gst::MessageView;

        match msg.view() {
            MessageView::Eos(..) => Some(Self::Eos { buffers }),
            MessageView::Error(err) => Some(Self::Error(BusError::from_message(err))),
            _ => None,
        }
    }

    pub fn is_eos(&self) -> bool {
        matches!(self, Self::Eos { .. })
    }

    pub fn error(&self) -> Option<&BusError> {
        match self {
            Self::Error(err) => Some(err),
            Self::Eos { .. } => None,
        }
    }

    pub fn buffers(&self) -> Option<u64> {
        match self {
            Self::Eos { buffers } => *buffers,
            Self::Error(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        use std::sync::Once;
        static INIT: Once = Once::new();

        INIT.call_once(|| {
            gst::init().unwrap();
        });
    }

    #[test]
    fn eos_ends_the_run() {
        init();

        let msg = gst::message::Eos::new();
        let outcome = Outcome::from_message(&msg, Some(10)).unwrap();

        assert!(outcome.is_eos());
        assert_eq!(outcome.buffers(), Some(10));
        assert!(outcome.error().is_none());
    }

    #[test]
    fn error_ends_the_run() {
        init();

        let msg = gst::message::Error::builder(gst::CoreError::Failed, "boom")
            .debug("details")
            .build();
        let outcome = Outcome::from_message(&msg, Some(3)).unwrap();

        assert!(!outcome.is_eos());
        assert_eq!(outcome.buffers(), None);

        let err = outcome.error().unwrap();
        assert!(err.error.matches(gst::CoreError::Failed));
        assert_eq!(err.error.message(), "boom");
        assert_eq!(err.debug.as_deref(), Some("details"));
        assert_eq!(err.source, None);
        assert_eq!(err.to_string(), "Error from <unknown>: boom (details)");
    }

    #[test]
    fn other_messages_are_ignored() {
        init();

        let msg = gst::message::Warning::new(gst::CoreError::Failed, "careful");
        assert!(Outcome::from_message(&msg, None).is_none());

        let msg = gst::message::Latency::new();
        assert!(Outcome::from_message(&msg, None).is_none());
    }
}
