pub(crate) mod gate;
pub(crate) mod store;
pub(crate) mod writer;
