use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use liquid_scene::cli::Cli;
use liquid_scene::core::{FpsCounter, Viewport};
use liquid_scene::preview::render_preview;
use liquid_scene::renderer::Renderer;
use liquid_scene::state::SceneState;

const FPS_UPDATE_INTERVAL: f32 = 1.0;

struct App {
    cli: Cli,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    state: SceneState,
    fps: FpsCounter,
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new(cli: Cli, state: SceneState) -> Self {
        Self {
            cli,
            window: None,
            renderer: None,
            state,
            fps: FpsCounter::new(FPS_UPDATE_INTERVAL),
            init_error: None,
        }
    }

    /// Outcome of the run: a startup failure makes the process exit non-zero
    fn finish(mut self) -> Result<()> {
        match self.init_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Record a fatal startup error and stop the event loop
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.init_error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let tick = self.state.tick();

        let Some(renderer) = &mut self.renderer else {
            return;
        };

        if tick.environment_ready {
            if let Some(map) = self.state.environment().map() {
                renderer.upload_environment(map);
            }
        }

        match renderer.render(&self.state) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {}", e),
        }

        if let Some(fps) = self.fps.frame() {
            log::debug!("FPS: {:.1} (tick {})", fps, tick.frame.number);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let title = format!("Liquid Scene - {}", self.state.scene().name);
        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(title)
                .with_inner_size(winit::dpi::PhysicalSize::new(self.cli.width, self.cli.height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("creating window"));
                return;
            }
        };

        let size = window.inner_size();
        self.state.on_resize(size.width, size.height);

        let renderer = match pollster::block_on(Renderer::new(window.clone(), &self.state)) {
            Ok(r) => r,
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("initializing renderer"));
                return;
            }
        };

        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.state.on_resize(size.width, size.height);
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn snapshot(cli: &Cli, mut state: SceneState) -> Result<()> {
    let Some(path) = &cli.snapshot else {
        return Ok(());
    };

    state.environment_mut().wait();
    state.driver_mut().advance(cli.snapshot_ticks);

    let frame = render_preview(&state, state.viewport());
    frame
        .save_png(path)
        .with_context(|| format!("writing snapshot for scene '{}'", state.scene().name))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.scene_config().context("loading scene config")?;
    let viewport = Viewport::new(cli.width.max(1), cli.height.max(1));
    let state = SceneState::new(config, viewport).context("building scene")?;

    if cli.snapshot.is_some() {
        return snapshot(&cli, state);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli, state);

    log::info!("Liquid scene - Escape to quit");
    event_loop.run_app(&mut app)?;

    app.finish()
}
