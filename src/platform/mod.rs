//=========================================================================
// Platform Subsystem
//=========================================================================
//
// The main-thread side of the arcade: owns the window and the winit
// event loop, ships input to the logic thread and shows the HUD.
//
// Architecture:
// ```text
//  Main Thread:                        Logic Thread:
//  ┌─────────────────────────────┐    ┌──────────────────┐
//  │  winit event loop           │    │  InputSystem     │
//  │   ↓                         │    │   ↓              │
//  │  InputProcessor             │    │  GameSession     │
//  │   ↓                         │    │   ↓              │
//  │  InputBuffer                │    │  HudUpdate ──────┼──┐
//  │   ↓ RedrawRequested (flush) │    └──────────────────┘  │
//  │  Sender<PlatformEvent> ─────┼──────────↑               │
//  │                             │                          │
//  │  window title  <────────────┼──── Receiver<HudUpdate> ─┘
//  └─────────────────────────────┘
// ```
//
// RedrawRequested is the frame boundary: everything buffered since the
// previous redraw goes over as one `PlatformEvent::Inputs`, and the
// newest HUD line (if any arrived) becomes the window title. Empty
// batches are not sent.
//
// If the logic thread is gone the platform keeps running so the window
// can still be closed; dropped input is logged.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use crate::config::WindowConfig;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::scoring::HudUpdate;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== Platform ============================================================

/// Window plus input aggregation. Not `Send`; lives on the main thread.
pub(crate) struct Platform {
    /// Created in `resumed()`.
    window: Option<Window>,
    window_config: WindowConfig,
    buffer: InputBuffer,
    event_sender: Sender<PlatformEvent>,
    hud_receiver: Receiver<HudUpdate>,
    hud_text: Option<String>,
    input_processor: InputProcessor,
}

impl Platform {
    pub(crate) fn new(
        event_sender: Sender<PlatformEvent>,
        hud_receiver: Receiver<HudUpdate>,
        window_config: WindowConfig,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            window_config,
            buffer: InputBuffer::new(),
            event_sender,
            hud_receiver,
            hud_text: None,
            input_processor: InputProcessor::new(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop on the calling thread until the window
    /// closes.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Frame Boundary ---------------------------------------------------

    fn flush_input_buffer(&mut self) {
        let Some((discrete, continuous)) = self.buffer.drain() else {
            return;
        };
        let discrete_count = discrete.len();
        let continuous_count = continuous.len();

        trace!(
            target: "platform::input",
            "Flushing {} discrete + {} continuous events",
            discrete_count,
            continuous_count
        );

        if self.event_sender.send(PlatformEvent::Inputs { discrete, continuous }).is_err() {
            warn!(
                target: "platform::input",
                "Logic thread gone, dropping {} discrete and {} continuous events",
                discrete_count,
                continuous_count
            );
        }
    }

    /// Keeps the newest HUD line; returns whether it changed.
    fn poll_hud(&mut self) -> bool {
        let Some(latest) = self.hud_receiver.try_iter().last() else {
            return false;
        };
        if self.hud_text.as_deref() == Some(latest.text.as_str()) {
            return false;
        }
        trace!(target: "platform", "HUD [{}]: {}", latest.mount, latest.text);
        self.hud_text = Some(latest.text);
        true
    }

    fn title(&self) -> String {
        match &self.hud_text {
            Some(text) => format!("{} | {}", self.window_config.title, text),
            None => self.window_config.title.clone(),
        }
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        let _ = self.event_sender.send(PlatformEvent::WindowClosed);
        event_loop.exit();
    }
}

//=== winit Integration ===================================================

impl ApplicationHandler for Platform {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists, resume ignored");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.title())
            .with_inner_size(LogicalSize::new(self.window_config.width, self.window_config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                self.input_processor.set_scale_factor(window.scale_factor());
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.close(event_loop);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.close(event_loop);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.input_processor.set_scale_factor(*scale_factor);
            }

            WindowEvent::Focused(false) => {
                for event in self.input_processor.release_all() {
                    self.buffer.push_discrete(event);
                }
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", state);
                self.input_processor.update_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.input_processor.process_mouse_move(position.x, position.y);
                self.buffer.push_continuous(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.buffer.push_discrete(event);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(event) = self.input_processor.process_mouse_button(*button, *state) {
                    self.buffer.push_discrete(event);
                }
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();

                let hud_changed = self.poll_hud();
                if let Some(window) = &self.window {
                    if hud_changed {
                        window.set_title(&self.title());
                    }
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode};
    use crate::core::scoring::MountPoint;
    use crossbeam_channel::unbounded;

    fn platform() -> (Platform, Receiver<PlatformEvent>, Sender<HudUpdate>) {
        let (tx, rx) = unbounded();
        let (hud_tx, hud_rx) = unbounded();
        let config = WindowConfig { title: "Arcade".into(), ..WindowConfig::default() };
        (Platform::new(tx, hud_rx, config), rx, hud_tx)
    }

    fn hud(text: &str) -> HudUpdate {
        HudUpdate { mount: MountPoint::new("main"), text: text.into() }
    }

    #[test]
    fn window_is_created_lazily() {
        let (platform, _rx, _hud) = platform();
        assert!(platform.window.is_none());
    }

    #[test]
    fn flush_empty_buffer_is_noop() {
        let (mut platform, rx, _hud) = platform();
        platform.flush_input_buffer();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn flush_sends_one_batch_then_nothing() {
        let (mut platform, rx, _hud) = platform();
        platform.buffer.push_discrete(InputEvent::key_down(KeyCode::Space));
        platform.buffer.push_continuous(InputEvent::MouseMoved { x: 1.0, y: 2.0 });

        platform.flush_input_buffer();
        platform.flush_input_buffer();

        match rx.try_recv() {
            Ok(PlatformEvent::Inputs { discrete, continuous }) => {
                assert_eq!(discrete, vec![InputEvent::key_down(KeyCode::Space)]);
                assert_eq!(continuous.len(), 1);
            }
            other => panic!("Expected Inputs event, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn flush_survives_disconnected_core() {
        let (mut platform, rx, _hud) = platform();
        platform.buffer.push_discrete(InputEvent::key_down(KeyCode::KeyA));
        drop(rx);
        platform.flush_input_buffer();
        assert!(platform.buffer.is_empty());
    }

    #[test]
    fn title_follows_latest_hud_line() {
        let (mut platform, _rx, hud_tx) = platform();
        assert_eq!(platform.title(), "Arcade");
        assert!(!platform.poll_hud());

        hud_tx.send(hud("Score: 1")).unwrap();
        hud_tx.send(hud("Score: 2")).unwrap();
        assert!(platform.poll_hud());
        assert_eq!(platform.title(), "Arcade | Score: 2");

        hud_tx.send(hud("Score: 2")).unwrap();
        assert!(!platform.poll_hud());
    }
}
