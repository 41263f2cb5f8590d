//! Glasspane: privileged host process for a capture-protected desktop overlay.

mod app;
mod bridge;
mod config;
mod error;
mod hotkey_listener;
mod hotkeys;
mod overlay;
mod service;
mod storage;
#[cfg(test)]
mod tests;
mod window_command;

pub(crate) use {
    app::App,
    error::{AppError, Result as AppResult},
    hotkey_listener::HotkeyListener,
    hotkeys::{HotkeyMap, HotkeyRegistry},
    overlay::OverlayWindow,
    service::ChildProcessConnector,
    window_command::WindowCommand,
};

use crate::config::Config;

use std::sync::Arc;

use glasspane_core::{EventBus, SessionCell, SessionCommands, route_capture};
use tao::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, warn};

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("glasspane=debug")
        .init();

    let event_loop = EventLoopBuilder::<WindowCommand>::with_user_event().build();
    let window_proxy = event_loop.create_proxy();

    // Both live on the main thread — tao windows and the global hotkey
    // manager are !Send, and tao's loop pumps the platform messages the
    // hotkey manager needs.
    let mut overlay: Option<OverlayWindow> = None;
    let mut registry: Option<HotkeyRegistry> = None;

    let (map_tx, map_rx) = watch::channel(HotkeyMap::new());

    event_loop.run(move |event, target, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::NewEvents(tao::event::StartCause::Init) => {
                let config = match Config::load() {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Failed to load config: {:?}", e);
                        std::process::exit(1);
                    }
                };

                let keybinds_path = match Config::keybinds_path() {
                    Ok(path) => path,
                    Err(e) => {
                        error!("Failed to resolve keybinds path: {:?}", e);
                        std::process::exit(1);
                    }
                };

                overlay = match OverlayWindow::create(target, &config.window) {
                    Ok(window) => Some(window),
                    Err(e) => {
                        error!("Failed to create overlay window: {:?}", e);
                        std::process::exit(1);
                    }
                };

                registry = match HotkeyRegistry::new(map_tx.clone()) {
                    Ok(registry) => Some(registry),
                    Err(e) => {
                        error!("Failed to create hotkey registry: {:?}", e);
                        std::process::exit(1);
                    }
                };

                let bus = EventBus::new();
                let connector = Arc::new(ChildProcessConnector::new(&config.service));
                let commands =
                    SessionCommands::new(Arc::new(SessionCell::new()), bus.clone(), connector);

                let bridge_addr = config.bridge_addr();
                let (message_tx, message_rx) = mpsc::channel(32);
                let (shutdown_tx, shutdown_rx) = watch::channel(false);

                let window_proxy = window_proxy.clone();
                let map_rx = map_rx.clone();

                // Async work lives on its own thread; the main thread
                // stays dedicated to the window and hotkey manager.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        let app = App::new(
                            commands,
                            bus.clone(),
                            window_proxy.clone(),
                            message_rx,
                            shutdown_tx,
                            keybinds_path,
                        );
                        let listener = HotkeyListener::new(map_rx, window_proxy, bus.clone());
                        let bridge_state = bridge::BridgeState::new(message_tx, bus);

                        tokio::join!(
                            app.run(),
                            listener.run(shutdown_rx.clone()),
                            async {
                                if let Err(e) =
                                    bridge::serve(bridge_addr, bridge_state, shutdown_rx).await
                                {
                                    error!(error = ?e, "Bridge error");
                                }
                            }
                        );
                    });
                });
            }
            Event::UserEvent(command) => match command {
                WindowCommand::SetOpacity { value, done } => {
                    let applied = overlay
                        .as_ref()
                        .map(|window| window.set_opacity(value))
                        .unwrap_or(false);
                    let _ = done.send(applied);
                }
                WindowCommand::Nudge(direction) => {
                    if let Some(window) = overlay.as_ref() {
                        window.nudge(direction);
                    }
                }
                WindowCommand::ToggleVisibility => {
                    if let Some(window) = overlay.as_mut() {
                        window.toggle_visibility();
                    }
                }
                WindowCommand::ToggleClickThrough => {
                    if let Some(window) = overlay.as_mut() {
                        window.toggle_click_through();
                    }
                }
                WindowCommand::ReassertContentProtection => {
                    if let Some(window) = overlay.as_ref() {
                        window.reassert_content_protection();
                    }
                }
                WindowCommand::InstallKeybinds(set) => {
                    if let Some(registry) = registry.as_mut() {
                        registry.install(&set);
                    }
                    if let Some(window) = overlay.as_mut() {
                        window.mark_ready();
                    }
                }
                WindowCommand::RouteCapture { reply } => {
                    let selection = overlay
                        .as_ref()
                        .and_then(|window| route_capture(&window.capture_sources()));
                    let _ = reply.send(selection);
                }
                WindowCommand::Close => {
                    teardown(&mut registry, &mut overlay);
                    *control_flow = ControlFlow::ExitWithCode(0);
                }
            },
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                warn!("Window close requested by the platform");
                teardown(&mut registry, &mut overlay);
                *control_flow = ControlFlow::ExitWithCode(0);
            }
            _ => {}
        }
    });
}

/// Unregister every hotkey and close the window. The live session, if any,
/// is left to its own lifecycle; its child exits with the host process.
fn teardown(registry: &mut Option<HotkeyRegistry>, overlay: &mut Option<OverlayWindow>) {
    if let Some(registry) = registry.as_mut() {
        registry.clear();
    }
    if let Some(window) = overlay.as_mut() {
        window.close();
    }
}
