pub mod config_panel;
pub mod header;
pub mod image_upload;
pub mod loader;
pub mod social_mockups;
