pub(crate) mod controls;
pub(crate) mod frame;
pub(crate) mod photo;
