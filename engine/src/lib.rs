//====================================================================

use std::path::PathBuf;

use common::Size;
use content::ContentLoader;
use retained::RetainedSurface;
use scene::Scene;
use surface::{ElementKind, EventKind, Surface, UiEvent};
use timer::Debounce;
use web_time::{Duration, Instant};

pub mod content;
pub mod present;
pub mod retained;
pub mod scene;
pub mod surface;
pub mod timer;
pub mod window;

pub use window::Runner;
pub use winit::error::EventLoopError;

//====================================================================

const DEFAULT_FPS: f32 = 1. / 60.;
const DEFAULT_RESIZE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct Config {
    pub title: String,
    pub size: Size<u32>,
    pub fps: Duration,
    pub resize_delay: Duration,
    /// Directory image sources are resolved against
    pub asset_root: PathBuf,
    /// Directory content sources are resolved against
    pub content_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Untitled".into(),
            size: Size::new(1280, 720),
            fps: Duration::from_secs_f32(DEFAULT_FPS),
            resize_delay: DEFAULT_RESIZE_DELAY,
            asset_root: PathBuf::from("assets"),
            content_root: PathBuf::from("assets"),
        }
    }
}

//====================================================================

/// Supplies scenes to the host. `next_scene` is asked after every draw,
/// event and content delivery.
pub trait App: 'static {
    fn first_scene(&mut self) -> Box<dyn Scene>;
    fn next_scene(&mut self) -> Option<Box<dyn Scene>>;
}

//====================================================================

pub struct Host {
    app: Box<dyn App>,
    scene: Box<dyn Scene>,
    surface: RetainedSurface,
    loader: Box<dyn ContentLoader>,

    resize: Debounce<Size<f32>>,
    generation: u64,
}

impl Host {
    pub fn new(
        app: impl App,
        size: Size<f32>,
        loader: impl ContentLoader + 'static,
        resize_delay: Duration,
    ) -> Self {
        let mut app = Box::new(app);
        let scene = app.first_scene();

        log::info!("Starting host with surface size {}", size);

        Self {
            app,
            scene,
            surface: RetainedSurface::new(size),
            loader: Box::new(loader),
            resize: Debounce::new(resize_delay),
            generation: 0,
        }
    }

    #[inline]
    pub fn surface(&self) -> &RetainedSurface {
        &self.surface
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn pending_resizes(&self) -> usize {
        self.resize.pending()
    }

    /// Record a viewport size. It reaches the scene once no newer size
    /// arrived for the resize delay.
    #[inline]
    pub fn request_resize(&mut self, size: Size<f32>, now: Instant) {
        self.resize.arm(now, size);
    }

    /// Run the side channels that live outside of `draw`: the debounced
    /// resize, finished content loads and the scene's own timers. Returns
    /// the new surface size when the debounced resize was applied.
    pub fn poll(&mut self, now: Instant) -> Option<Size<f32>> {
        let resized = self.resize.poll(now).map(|size| {
            log::debug!("Applying debounced resize to {}", size);
            self.surface.resize(size);
            size
        });

        self.loader
            .poll()
            .into_iter()
            .for_each(|response| match response.generation == self.generation {
                true => self.scene.content(&mut self.surface, response),
                false => log::debug!(
                    "Dropping content '{}' for replaced scene {}",
                    response.source,
                    response.generation
                ),
            });

        self.scene.poll(&mut self.surface, now);
        self.switch_scene();

        resized
    }

    pub fn draw(&mut self, now: Instant) {
        self.surface.begin_frame(now);
        self.scene.draw(&mut self.surface);

        self.surface
            .take_content_requests()
            .into_iter()
            .for_each(|request| self.loader.request(request));

        self.switch_scene();
    }

    pub fn event(&mut self, event: UiEvent) {
        log::trace!("Dispatching {:?}", event);

        self.scene.event(&mut self.surface, &event);
        self.switch_scene();
    }

    /// Pointer release at `point`. Inputs take focus, click listeners fire.
    pub fn click(&mut self, point: glam::Vec2) {
        let target = self.surface.hit_test(point);
        self.surface.focus(target);

        let listening = target.filter(|id| {
            self.surface
                .element(*id)
                .map(|element| element.listens(EventKind::Click))
                .unwrap_or(false)
        });

        if let Some(id) = listening {
            self.event(UiEvent::Click(id));
        }
    }

    pub fn type_text(&mut self, text: &str) {
        if let Some(id) = self.surface.type_text(text) {
            self.key_up(id);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(id) = self.surface.backspace() {
            self.key_up(id);
        }
    }

    fn key_up(&mut self, id: surface::ElementId) {
        let listening = self
            .surface
            .element(id)
            .map(|element| {
                element.kind() == &ElementKind::Input && element.listens(EventKind::KeyUp)
            })
            .unwrap_or(false);

        if listening {
            self.event(UiEvent::KeyUp(id));
        }
    }

    fn switch_scene(&mut self) {
        let mut next = None;
        while let Some(scene) = self.app.next_scene() {
            next = Some(scene);
        }

        if let Some(scene) = next {
            self.generation += 1;
            log::info!("Switching to scene generation {}", self.generation);

            self.surface.set_generation(self.generation);
            self.scene = scene;
        }
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        rc::Rc,
        sync::mpsc::{self, Receiver, Sender},
    };

    use super::*;
    use crate::content::{ContentResponse, StaticLoader};

    #[derive(Default)]
    struct Log {
        draws: Vec<(usize, Size<f32>)>,
        content: Vec<(usize, String)>,
        events: Vec<(usize, UiEvent)>,
    }

    /// Fetches on its first draw, adds a clickable input and asks to move on
    /// when clicked.
    struct Probe {
        index: usize,
        log: Rc<RefCell<Log>>,
        next: Sender<usize>,
        drawn: bool,
    }

    impl Scene for Probe {
        fn draw(&mut self, surface: &mut dyn Surface) {
            self.log
                .borrow_mut()
                .draws
                .push((self.index, surface.size()));

            if !self.drawn {
                self.drawn = true;
                surface.fetch("page.html", 1);

                let input = surface.create_input("");
                if let Some(element) = surface.element_mut(input) {
                    element
                        .set_position(0., 0.)
                        .set_size(50., 20.)
                        .listen(EventKind::Click)
                        .listen(EventKind::KeyUp);
                }
            }
        }

        fn event(&mut self, _surface: &mut dyn Surface, event: &UiEvent) {
            self.log.borrow_mut().events.push((self.index, *event));
            if let UiEvent::Click(_) = event {
                let _ = self.next.send(self.index + 1);
            }
        }

        fn content(&mut self, _surface: &mut dyn Surface, response: ContentResponse) {
            self.log
                .borrow_mut()
                .content
                .push((self.index, response.result.unwrap_or_default()));
        }
    }

    struct ProbeApp {
        log: Rc<RefCell<Log>>,
        sender: Sender<usize>,
        receiver: Receiver<usize>,
    }

    impl ProbeApp {
        fn scene(&self, index: usize) -> Box<dyn Scene> {
            Box::new(Probe {
                index,
                log: self.log.clone(),
                next: self.sender.clone(),
                drawn: false,
            })
        }
    }

    impl App for ProbeApp {
        fn first_scene(&mut self) -> Box<dyn Scene> {
            self.scene(0)
        }

        fn next_scene(&mut self) -> Option<Box<dyn Scene>> {
            let index = self.receiver.try_recv().ok()?;
            Some(self.scene(index))
        }
    }

    fn host() -> (Host, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let (sender, receiver) = mpsc::channel();
        let app = ProbeApp {
            log: log.clone(),
            sender,
            receiver,
        };

        let loader = StaticLoader::new().with_page("page.html", "<p>page</p>");
        let host = Host::new(app, Size::new(800., 600.), loader, DEFAULT_RESIZE_DELAY);
        (host, log)
    }

    #[test]
    fn resize_is_debounced() {
        let (mut host, log) = host();
        let start = Instant::now();

        host.draw(start);
        (0..20).for_each(|step| {
            host.request_resize(Size::new(800. + step as f32, 600.), start);
        });
        assert_eq!(host.pending_resizes(), 1);

        assert_eq!(host.poll(start + Duration::from_millis(100)), None);
        host.draw(start + Duration::from_millis(100));

        assert_eq!(
            host.poll(start + Duration::from_millis(500)),
            Some(Size::new(819., 600.))
        );
        host.draw(start + Duration::from_millis(510));

        let sizes = log
            .borrow()
            .draws
            .iter()
            .map(|(_, size)| size.width)
            .collect::<Vec<_>>();
        assert_eq!(sizes, vec![800., 800., 819.]);
    }

    #[test]
    fn click_switches_scene_and_drops_stale_content() {
        let (mut host, log) = host();
        let now = Instant::now();

        host.draw(now);
        assert_eq!(host.generation(), 0);

        // Scene 0 is replaced before its fetch resolves
        host.click(glam::vec2(10., 10.));
        assert_eq!(host.generation(), 1);
        assert!(host.surface().focused().is_some());

        host.poll(now);
        assert!(log.borrow().content.is_empty());

        // Scene 1 fetches on its first draw and receives its answer
        host.draw(now);
        host.poll(now);
        assert_eq!(log.borrow().content, vec![(1, "<p>page</p>".to_string())]);
    }

    #[test]
    fn key_up_reaches_listening_input() {
        let (mut host, log) = host();
        let now = Instant::now();
        host.draw(now);

        // Nothing focused yet
        host.type_text("a");
        assert!(log.borrow().events.is_empty());

        host.click(glam::vec2(400., 400.));
        host.type_text("a");
        assert!(log.borrow().events.is_empty());

        let input = host.surface().elements().next().map(|e| e.id()).unwrap();
        host.surface.focus(Some(input));
        host.type_text("a");
        host.backspace();

        assert_eq!(
            log.borrow().events,
            vec![(0, UiEvent::KeyUp(input)), (0, UiEvent::KeyUp(input))]
        );
    }
}

//====================================================================
