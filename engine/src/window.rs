//====================================================================

use std::sync::Arc;

use common::Size;
use renderer::Renderer;
use web_time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    error::{EventLoopError, OsError},
    event::{ElementState, MouseButton, StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{WindowAttributes, WindowId},
};

use crate::{content::FileLoader, present, App, Config, Host};

//====================================================================

#[derive(Clone)]
pub struct Window(pub Arc<winit::window::Window>);
impl Window {
    pub(super) fn new(event_loop: &ActiveEventLoop, config: &Config) -> Result<Self, OsError> {
        let attributes = WindowAttributes::default()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.size.width, config.size.height));

        let window = event_loop.create_window(attributes)?;
        Ok(Self(Arc::new(window)))
    }

    #[inline]
    pub fn size(&self) -> Size<u32> {
        let window_size = self.0.inner_size();

        Size {
            width: window_size.width,
            height: window_size.height,
        }
    }

    #[inline]
    pub fn request_redraw(&self) {
        self.0.request_redraw();
    }
}

//====================================================================

struct State {
    fps: Duration,
    window: Window,
    renderer: Renderer,
    host: Host,
    cursor: glam::Vec2,
}

impl State {
    fn new(event_loop: &ActiveEventLoop, config: &Config, app: impl App) -> Option<Self> {
        let window = match Window::new(event_loop, config) {
            Ok(window) => window,
            Err(e) => {
                log::error!("Unable to create window: {}", e);
                return None;
            }
        };

        let size = window.size();

        let renderer = match Renderer::new(window.0.clone(), size, config.asset_root.clone()) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Unable to create renderer: {}", e);
                return None;
            }
        };

        let host = Host::new(
            app,
            size.to_f32(),
            FileLoader::new(config.content_root.clone()),
            config.resize_delay,
        );

        Some(Self {
            fps: config.fps,
            window,
            renderer,
            host,
            cursor: glam::Vec2::ZERO,
        })
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, event: WindowEvent) {
        match event {
            WindowEvent::Resized(physical_size) => {
                if physical_size.width == 0 || physical_size.height == 0 {
                    log::warn!(
                        "Window resized to invalid size ({}, {})",
                        physical_size.width,
                        physical_size.height
                    );
                    return;
                }
                let size = Size::new(physical_size.width, physical_size.height);

                // The swapchain follows right away, the layout waits for the debounce
                self.renderer.resize(size);
                self.host.request_resize(size.to_f32(), Instant::now());
            }

            WindowEvent::CloseRequested => {
                log::info!("Close requested. Closing App");
                event_loop.exit();
            }

            WindowEvent::Destroyed => log::error!("Window was destroyed"),

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = glam::vec2(position.x as f32, position.y as f32);
            }

            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => {
                self.host.click(self.cursor);
                self.window.request_redraw();
            }

            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                match (&event.logical_key, &event.text) {
                    (Key::Named(NamedKey::Backspace), _) => self.host.backspace(),
                    (_, Some(text)) => self.host.type_text(text),
                    _ => {}
                }
                self.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                event_loop.set_control_flow(ControlFlow::wait_duration(self.fps));
                self.tick();
            }

            _ => {}
        }
    }

    fn tick(&mut self) {
        let now = Instant::now();

        self.host.poll(now);
        self.host.draw(now);

        present::present(&mut self.renderer, self.host.surface());
        self.renderer.tick();
    }
}

//====================================================================

pub struct Runner<A: App> {
    config: Config,
    app: Option<A>,
    state: Option<State>,
}

impl<A: App> Runner<A> {
    pub fn run(config: Config, app: A) -> Result<(), EventLoopError> {
        log::info!("Starting '{}' at {}", config.title, config.size);

        EventLoop::new()?.run_app(&mut Self {
            config,
            app: Some(app),
            state: None,
        })
    }
}

impl<A: App> ApplicationHandler for Runner<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        log::trace!("App Resumed - Creating state.");

        if self.state.is_some() {
            log::warn!("State already exists.");
            return;
        }

        let Some(app) = self.app.take() else {
            log::warn!("App was already handed to a previous state.");
            return;
        };

        match State::new(event_loop, &self.config, app) {
            Some(state) => self.state = Some(state),
            None => event_loop.exit(),
        }
    }

    #[inline]
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(state) = &mut self.state {
            state.window_event(event_loop, event);
        }
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let Some(state) = &mut self.state {
            if let StartCause::ResumeTimeReached { .. } = cause {
                state.window.request_redraw();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Content and timers can resolve between frames
        if let Some(state) = &mut self.state {
            state.host.poll(Instant::now());
        }
    }
}

//====================================================================
