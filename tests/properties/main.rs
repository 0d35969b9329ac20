//! Property test suite entry point.

mod codec_props;
mod ranking_props;
mod similarity_props;
