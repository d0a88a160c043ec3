//!
//! Description of the pipeline a [`crate::PipelineRunner`] drives
//!

/// `gst-launch` description of the default smoke pipeline
pub const DEFAULT_DESCRIPTION: &str = "videotestsrc num-buffers=10 ! testpassthrough ! autovideosink";

/// Three element pipeline: a source emitting a bounded number of buffers,
/// the element under test and a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    source: String,
    num_buffers: Option<u32>,
    element: String,
    sink: String,
    disable_segtrap: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source: "videotestsrc".to_owned(),
            num_buffers: Some(10),
            element: "testpassthrough".to_owned(),
            sink: "autovideosink".to_owned(),
            disable_segtrap: true,
        }
    }
}

impl RunConfig {
    /// Source element, may carry its own properties
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// `num-buffers` set on the source, `None` leaves it unset
    pub fn num_buffers(mut self, num_buffers: Option<u32>) -> Self {
        self.num_buffers = num_buffers;
        self
    }

    pub fn element(mut self, element: impl Into<String>) -> Self {
        self.element = element.into();
        self
    }

    pub fn sink(mut self, sink: impl Into<String>) -> Self {
        self.sink = sink.into();
        self
    }

    /// Keep GStreamer from installing its SIGSEGV handler during init
    pub fn disable_segtrap(mut self, disable: bool) -> Self {
        self.disable_segtrap = disable;
        self
    }

    pub fn expected_buffers(&self) -> Option<u32> {
        self.num_buffers
    }

    pub fn element_name(&self) -> &str {
        &self.element
    }

    pub fn segtrap_disabled(&self) -> bool {
        self.disable_segtrap
    }

    pub fn description(&self) -> String {
        let source = match self.num_buffers {
            Some(n) => format!("{} num-buffers={n}", self.source),
            None => self.source.clone(),
        };

        format!("{source} ! {} ! {}", self.element, self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_smoke_pipeline() {
        assert_eq!(RunConfig::default().description(), DEFAULT_DESCRIPTION);
    }

    #[test]
    fn unbounded_source_omits_num_buffers() {
        let config = RunConfig::default().num_buffers(None).sink("fakesink");

        assert_eq!(
            config.description(),
            "videotestsrc ! testpassthrough ! fakesink"
        );
        assert_eq!(config.expected_buffers(), None);
    }

    #[test]
    fn source_properties_are_kept() {
        let config = RunConfig::default()
            .source("audiotestsrc wave=silence")
            .num_buffers(Some(3));

        assert_eq!(
            config.description(),
            "audiotestsrc wave=silence num-buffers=3 ! testpassthrough ! autovideosink"
        );
    }
}
