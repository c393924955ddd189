pub(crate) mod light;
