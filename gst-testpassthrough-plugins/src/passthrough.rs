mod imp;

use gst::glib;
use gst::prelude::*;

glib::wrapper! {

    /// Element that forwards buffers, events and queries between its pads untouched
    pub struct TestPassthrough(ObjectSubclass<imp::TestPassthrough>) @extends gst::Element, gst::Object;
}

pub fn register(plugin: &gst::Plugin) -> Result<(), glib::BoolError> {
    gst::Element::register(
        Some(plugin),
        "testpassthrough",
        gst::Rank::NONE,
        TestPassthrough::static_type(),
    )
}
