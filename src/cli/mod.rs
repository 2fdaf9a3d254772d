pub mod costs;
pub mod fx;
pub mod setup;
pub mod theme;
pub mod timeline;
pub mod ui;
pub mod wheel;
