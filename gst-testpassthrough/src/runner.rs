//!
//! Drives a pipeline from NULL to PLAYING and back, waiting on the bus for
//! end-of-stream or an error
//!

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, LazyLock,
};

use gst::prelude::*;
use parking_lot::Mutex;

use crate::{glib, Outcome, RunConfig, RunError};

static CAT: LazyLock<gst::DebugCategory> = LazyLock::new(|| {
    gst::DebugCategory::new(
        "testpassthrough-runner",
        gst::DebugColorFlags::empty(),
        Some("Passthrough pipeline runner"),
    )
});

/// Sets the pipeline to NULL however the run ends
struct PipelineGuard(gst::Pipeline);

impl std::ops::Deref for PipelineGuard {
    type Target = gst::Pipeline;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Drop for PipelineGuard {
    fn drop(&mut self) {
        let _ = self.0.set_state(gst::State::Null);
    }
}

/// Runs a `gst-launch` style pipeline to completion.
///
/// There is no timeout: [`PipelineRunner::run`] only returns once the bus
/// reports end-of-stream or an error, or when the pipeline cannot be started.
#[derive(Debug, Clone)]
pub struct PipelineRunner {
    description: String,
    probe_factory: String,
    disable_segtrap: bool,
}

impl Default for PipelineRunner {
    /// Runner for pipelines built by the caller, see [`PipelineRunner::run_pipeline`]
    fn default() -> Self {
        Self::new("")
    }
}

impl PipelineRunner {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            probe_factory: "testpassthrough".to_owned(),
            disable_segtrap: false,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            description: config.description(),
            probe_factory: config.element_name().to_owned(),
            disable_segtrap: config.segtrap_disabled(),
        }
    }

    /// Factory name of the element whose outgoing buffers are counted
    pub fn probe_factory(mut self, factory: impl Into<String>) -> Self {
        self.probe_factory = factory.into();
        self
    }

    pub fn disable_segtrap(mut self, disable: bool) -> Self {
        self.disable_segtrap = disable;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Installs a buffer counter on the src pad of the first element created
    /// by the probe factory
    fn install_counter(&self, pipeline: &gst::Pipeline) -> Option<Arc<AtomicU64>> {
        let element = pipeline.iterate_recurse().find(|e| {
            e.factory()
                .is_some_and(|f| f.name().as_str() == self.probe_factory)
        })?;

        let Some(pad) = element.static_pad("src") else {
            gst::warning!(CAT, obj: element, "no src pad to count buffers on");
            return None;
        };

        let counter = Arc::new(AtomicU64::new(0));
        let probe_counter = Arc::clone(&counter);
        pad.add_probe(gst::PadProbeType::BUFFER, move |_, _| {
            probe_counter.fetch_add(1, Ordering::Relaxed);
            gst::PadProbeReturn::Ok
        })?;

        gst::debug!(CAT, obj: pad, "counting buffers");
        Some(counter)
    }

    pub fn run(&self) -> Result<Outcome, RunError> {
        if self.disable_segtrap {
            gst::segtrap_set_enabled(false);
        }
        gst::init().map_err(RunError::Init)?;

        gst::info!(CAT, "launching '{}'", self.description);

        let pipeline = gst::parse::launch(&self.description)
            .map_err(RunError::Parse)?
            .downcast::<gst::Pipeline>()
            .map_err(|_| RunError::NotAPipeline)?;
        let pipeline = PipelineGuard(pipeline);

        self.run_pipeline(&pipeline)
    }

    /// Runs an already built pipeline and leaves it in NULL.
    ///
    /// GStreamer must be initialized, which is the case for anyone holding a
    /// pipeline.
    pub fn run_pipeline(&self, pipeline: &gst::Pipeline) -> Result<Outcome, RunError> {
        let bus = pipeline.bus().ok_or(RunError::NoBus)?;
        let counter = self.install_counter(pipeline);

        let context = glib::MainContext::new();
        let main_loop = glib::MainLoop::new(Some(&context), false);

        context
            .with_thread_default(|| self.run_loop(pipeline, &bus, &main_loop, counter))
            .map_err(RunError::Context)?
    }

    fn run_loop(
        &self,
        pipeline: &gst::Pipeline,
        bus: &gst::Bus,
        main_loop: &glib::MainLoop,
        counter: Option<Arc<AtomicU64>>,
    ) -> Result<Outcome, RunError> {
        let outcome = Arc::new(Mutex::new(None::<Outcome>));

        bus.add_signal_watch();

        let error_id = {
            let pipeline = pipeline.clone();
            let main_loop = main_loop.clone();
            let outcome = Arc::clone(&outcome);

            bus.connect_message(Some("error"), move |_, msg| {
                let _ = pipeline.set_state(gst::State::Null);

                let Some(res) = Outcome::from_message(msg, None) else {
                    return;
                };
                if let Some(err) = res.error() {
                    gst::error!(CAT, obj: pipeline, "{}", err);
                }

                outcome.lock().get_or_insert(res);
                main_loop.quit();
            })
        };

        let eos_id = {
            let pipeline = pipeline.clone();
            let main_loop = main_loop.clone();
            let outcome = Arc::clone(&outcome);

            bus.connect_message(Some("eos"), move |_, msg| {
                let buffers = counter.as_ref().map(|c| c.load(Ordering::Relaxed));
                gst::info!(CAT, obj: pipeline, "end of stream after {:?} buffers", buffers);

                if let Some(res) = Outcome::from_message(msg, buffers) {
                    outcome.lock().get_or_insert(res);
                }

                main_loop.quit();
                let _ = pipeline.set_state(gst::State::Null);
            })
        };

        let res = self.play(pipeline, bus, main_loop, &outcome);

        bus.disconnect(error_id);
        bus.disconnect(eos_id);
        bus.remove_signal_watch();

        pipeline.set_state(gst::State::Null)?;
        gst::info!(CAT, obj: pipeline, "pipeline back to NULL");

        res
    }

    fn play(
        &self,
        pipeline: &gst::Pipeline,
        bus: &gst::Bus,
        main_loop: &glib::MainLoop,
        outcome: &Mutex<Option<Outcome>>,
    ) -> Result<Outcome, RunError> {
        if let Err(err) = pipeline.set_state(gst::State::Playing) {
            gst::warning!(CAT, obj: pipeline, "failed to set PLAYING: {}", err);

            // Elements post their error before failing the state change
            return match bus.pop_filtered(&[gst::MessageType::Error]) {
                Some(msg) => Outcome::from_message(&msg, None).ok_or(RunError::StateChange(err)),
                None => Err(RunError::StateChange(err)),
            };
        }

        gst::debug!(CAT, obj: pipeline, "waiting for end of stream or error");
        main_loop.run();

        outcome.lock().take().ok_or(RunError::Interrupted)
    }
}
