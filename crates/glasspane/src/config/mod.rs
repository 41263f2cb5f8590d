mod bridge_config;
#[allow(clippy::module_inception)]
mod config;
mod service_config;
mod window_config;

pub(crate) use {
    bridge_config::BridgeConfig, config::Config, service_config::ServiceConfig,
    window_config::WindowConfig,
};

pub(crate) const DEFAULT_WINDOW_WIDTH: u32 = 1100;
pub(crate) const DEFAULT_WINDOW_HEIGHT: u32 = 800;
pub(crate) const DEFAULT_BRIDGE_PORT: u16 = 7937;

pub(crate) fn default_window_width() -> u32 {
    DEFAULT_WINDOW_WIDTH
}

pub(crate) fn default_window_height() -> u32 {
    DEFAULT_WINDOW_HEIGHT
}

pub(crate) fn default_bridge_port() -> u16 {
    DEFAULT_BRIDGE_PORT
}
