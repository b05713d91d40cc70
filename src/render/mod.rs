pub(crate) mod badge;
pub(crate) mod composite;
pub(crate) mod fonts;
pub(crate) mod svg_raster;
