pub(crate) mod engine;
pub(crate) mod parley_engine;
pub(crate) mod source;
