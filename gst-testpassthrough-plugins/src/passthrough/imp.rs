use std::sync::LazyLock;

use gst::glib;
use gst::prelude::*;
use gst::subclass::prelude::*;

static CAT: LazyLock<gst::DebugCategory> = LazyLock::new(|| {
    gst::DebugCategory::new(
        "testpassthrough",
        gst::DebugColorFlags::empty(),
        Some("Passthrough test element"),
    )
});

#[derive(Debug)]
pub struct TestPassthrough {
    sinkpad: gst::Pad,
    srcpad: gst::Pad,
}

impl TestPassthrough {
    fn sink_chain(
        &self,
        pad: &gst::Pad,
        buffer: gst::Buffer,
    ) -> Result<gst::FlowSuccess, gst::FlowError> {
        gst::trace!(CAT, obj: pad, "Forwarding buffer {:?}", buffer);

        let res = self.srcpad.push(buffer);
        if let Err(err) = res {
            gst::debug!(CAT, obj: pad, "Downstream returned {:?}", err);
        }

        res
    }

    fn sink_event(&self, pad: &gst::Pad, event: gst::Event) -> bool {
        gst::debug!(CAT, obj: pad, "Forwarding event {:?}", event);
        self.srcpad.push_event(event)
    }

    fn src_event(&self, pad: &gst::Pad, event: gst::Event) -> bool {
        gst::debug!(CAT, obj: pad, "Forwarding upstream event {:?}", event);
        self.sinkpad.push_event(event)
    }

    fn sink_query(
        &self,
        pad: &gst::Pad,
        parent: Option<&gst::Object>,
        query: &mut gst::QueryRef,
    ) -> bool {
        if matches!(query.view(), gst::QueryView::Caps(_)) {
            let res = pad.proxy_query_caps(query);
            gst::debug!(CAT, obj: pad, "Proxied caps query: {:?}", query);
            return res;
        }

        gst::Pad::query_default(pad, parent, query)
    }
}

#[glib::object_subclass]
impl ObjectSubclass for TestPassthrough {
    const NAME: &'static str = "GstTestPassthrough";
    type Type = super::TestPassthrough;
    type ParentType = gst::Element;

    fn with_class(klass: &Self::Class) -> Self {
        let sink_templ = klass.pad_template("sink").unwrap();
        let src_templ = klass.pad_template("src").unwrap();

        let sinkpad = gst::Pad::builder_from_template(&sink_templ)
            .chain_function(|pad, parent, buffer| {
                TestPassthrough::catch_panic_pad_function(
                    parent,
                    || Err(gst::FlowError::Error),
                    |this| this.sink_chain(pad, buffer),
                )
            })
            .event_function(|pad, parent, event| {
                TestPassthrough::catch_panic_pad_function(
                    parent,
                    || false,
                    |this| this.sink_event(pad, event),
                )
            })
            .query_function(|pad, parent, query| {
                TestPassthrough::catch_panic_pad_function(
                    parent,
                    || false,
                    |this| this.sink_query(pad, parent, query),
                )
            })
            .build();

        let srcpad = gst::Pad::builder_from_template(&src_templ)
            .event_function(|pad, parent, event| {
                TestPassthrough::catch_panic_pad_function(
                    parent,
                    || false,
                    |this| this.src_event(pad, event),
                )
            })
            .build();

        Self { sinkpad, srcpad }
    }
}

impl ObjectImpl for TestPassthrough {
    fn constructed(&self) {
        self.parent_constructed();

        let obj = self.obj();
        obj.add_pad(&self.sinkpad).unwrap();
        obj.add_pad(&self.srcpad).unwrap();
    }
}

impl GstObjectImpl for TestPassthrough {}

impl ElementImpl for TestPassthrough {
    fn metadata() -> Option<&'static gst::subclass::ElementMetadata> {
        static ELEMENT_METADATA: LazyLock<gst::subclass::ElementMetadata> = LazyLock::new(|| {
            gst::subclass::ElementMetadata::new(
                "Passthrough element",
                "Generic",
                "Proxy buffers",
                "Deka <speedcrash100@ya.ru>",
            )
        });
        Some(&*ELEMENT_METADATA)
    }

    fn pad_templates() -> &'static [gst::PadTemplate] {
        static PAD_TEMPLATES: LazyLock<Vec<gst::PadTemplate>> = LazyLock::new(|| {
            let caps = gst::Caps::new_any();

            vec![
                gst::PadTemplate::new(
                    "src",
                    gst::PadDirection::Src,
                    gst::PadPresence::Always,
                    &caps,
                )
                .unwrap(),
                gst::PadTemplate::new(
                    "sink",
                    gst::PadDirection::Sink,
                    gst::PadPresence::Always,
                    &caps,
                )
                .unwrap(),
            ]
        });
        PAD_TEMPLATES.as_ref()
    }
}
