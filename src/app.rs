use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::clock::{FirstTick, SystemClock};
use crate::error::AppError;
use crate::frame_loop::{Demo, FrameLoop, FrameScheduler, LoopState, TickOutcome};
use crate::render::GpuRenderer;
use crate::scene::Scene;

/// Configuration for the app window and loop.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub first_tick: FirstTick,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Vignette".to_string(),
            width: 800,
            height: 600,
            first_tick: FirstTick::Zero,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn first_tick(mut self, first_tick: FirstTick) -> Self {
        self.first_tick = first_tick;
        self
    }
}

/// Re-arms the loop by asking winit for another `RedrawRequested`.
struct WindowScheduler<'a>(&'a Window);

impl FrameScheduler for WindowScheduler<'_> {
    fn request_next_frame(&mut self) {
        self.0.request_redraw();
    }
}

/// Open a window and run `demo` on `scene` until the window closes, Escape
/// is pressed or a frame fails to render.
///
/// Keys: `F1` logs the demo's debug bindings, `Escape` stops the loop.
pub fn run(config: AppConfig, demo: Box<dyn Demo>, scene: Scene) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = VignetteApp {
        state: AppState::Pending {
            config,
            demo: Some(demo),
            scene: Some(scene),
        },
        error: None,
    };

    event_loop.run_app(&mut app)?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct VignetteApp {
    state: AppState,
    error: Option<AppError>,
}

enum AppState {
    Pending {
        config: AppConfig,
        demo: Option<Box<dyn Demo>>,
        scene: Option<Scene>,
    },
    Running {
        window: Arc<Window>,
        renderer: GpuRenderer,
        frame_loop: FrameLoop<SystemClock>,
        demo: Box<dyn Demo>,
        scene: Scene,
    },
}

impl VignetteApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        tracing::error!(error = %err, "stopping");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for VignetteApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let AppState::Pending {
            config,
            demo,
            scene,
        } = &mut self.state
        else {
            return;
        };
        let config = config.clone();
        let (Some(demo), Some(mut scene)) = (demo.take(), scene.take()) else {
            return;
        };

        let window_attrs = WindowAttributes::default()
            .with_title(format!("{} - {}", config.title, demo.name()))
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };
        let renderer = match GpuRenderer::new(window.clone()) {
            Ok(renderer) => renderer,
            Err(err) => return self.fail(event_loop, err.into()),
        };

        let size = window.inner_size();
        scene.context.resize(size.width, size.height);

        let mut frame_loop = FrameLoop::new(SystemClock::new(), config.first_tick);
        frame_loop.start(&mut WindowScheduler(&window));
        tracing::info!(demo = demo.name(), width = size.width, height = size.height, "demo started");

        self.state = AppState::Running {
            window,
            renderer,
            frame_loop,
            demo,
            scene,
        };
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let AppState::Running {
            window,
            renderer,
            frame_loop,
            demo,
            scene,
        } = &mut self.state
        else {
            return;
        };

        scene.context.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!(frames = frame_loop.frames(), "window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                renderer.resize(size.width, size.height);
                scene.context.resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput { event: key, .. }
                if key.state == ElementState::Pressed && !key.repeat =>
            {
                match key.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => frame_loop.stop_handle().stop(),
                    PhysicalKey::Code(KeyCode::F1) => {
                        for line in demo.describe() {
                            tracing::info!("{line}");
                        }
                    }
                    _ => {}
                }
            }
            WindowEvent::RedrawRequested => {
                let outcome = frame_loop.tick(
                    demo.as_mut(),
                    scene,
                    renderer,
                    &mut WindowScheduler(window.as_ref()),
                );
                scene.context.input.begin_frame();

                match outcome {
                    Ok(TickOutcome::Rendered(_)) => {}
                    Ok(TickOutcome::Skipped) => {
                        if frame_loop.state() == LoopState::Stopped {
                            event_loop.exit();
                        }
                    }
                    Err(err) => self.fail(event_loop, err.into()),
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_sets_fields() {
        let config = AppConfig::new()
            .title("Demo")
            .size(1280, 720)
            .first_tick(FirstTick::SinceStart);
        assert_eq!(config.title, "Demo");
        assert_eq!((config.width, config.height), (1280, 720));
        assert_eq!(config.first_tick, FirstTick::SinceStart);
    }
}
