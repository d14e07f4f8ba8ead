// Library exports for binaries and tests
pub mod config;
pub mod i18n;
pub mod routing;
pub mod server;
pub mod switcher;
