pub(crate) mod cpu;
pub(crate) mod placement;
pub(crate) mod surface;
