pub mod bus;
pub mod config;
pub mod error;
pub mod runner;

use gst::glib;
extern crate gstreamer as gst;

pub use bus::{BusError, Outcome};
pub use config::{RunConfig, DEFAULT_DESCRIPTION};
pub use error::RunError;
pub use runner::PipelineRunner;
