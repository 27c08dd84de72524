pub(crate) mod asset;
pub(crate) mod ffmpeg;
pub(crate) mod reader;
