/// RGB color arithmetic shared by every light-transport quantity.
pub mod color;
