//! Data module - page/panel model and JSON preview conversion

mod attributes;
mod converter;
mod model;

pub use attributes::{Attribute, AttributePalette, PaletteError, NO_ATTRIBUTE_LABEL};
pub use converter::PreviewConverter;
pub use model::{ChartRow, Page};
