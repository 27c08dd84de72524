pub(crate) mod effect;
pub(crate) mod frame;
pub(crate) mod gravity;
pub(crate) mod live;
pub(crate) mod queue;
