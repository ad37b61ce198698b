//====================================================================

use std::sync::mpsc::{self, Receiver, Sender};

use engine::{scene::Scene, App};

use crate::scenes::{self, successor, SceneKind, TransitionCallback};

//====================================================================

/// Drives the scene state machine. Every scene gets a callback that reports
/// its successor through a channel, drained whenever the host asks for the
/// next scene.
pub struct LaviOs {
    first: SceneKind,
    current: SceneKind,

    sender: Sender<SceneKind>,
    receiver: Receiver<SceneKind>,
}

impl LaviOs {
    #[inline]
    pub fn new() -> Self {
        Self::starting_at(SceneKind::Login)
    }

    pub fn starting_at(first: SceneKind) -> Self {
        let (sender, receiver) = mpsc::channel();

        Self {
            first,
            current: first,
            sender,
            receiver,
        }
    }

    #[inline]
    pub fn current(&self) -> SceneKind {
        self.current
    }

    fn callback(&self, kind: SceneKind) -> TransitionCallback {
        let sender = self.sender.clone();

        Box::new(move |argument: Option<&str>| {
            let next = successor(kind, argument);
            log::trace!("{:?} requests {:?}", kind, next);

            if sender.send(next).is_err() {
                log::warn!("Scene transition to {:?} has no receiver", next);
            }
        })
    }

    #[inline]
    fn build(&self, kind: SceneKind) -> Box<dyn Scene> {
        scenes::build(kind, self.callback(kind))
    }
}

impl Default for LaviOs {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl App for LaviOs {
    fn first_scene(&mut self) -> Box<dyn Scene> {
        log::info!("Starting at {:?}", self.first);

        self.current = self.first;
        self.build(self.first)
    }

    fn next_scene(&mut self) -> Option<Box<dyn Scene>> {
        let next = self.receiver.try_iter().last()?;
        log::info!("Switching from {:?} to {:?}", self.current, next);

        self.current = next;
        Some(self.build(next))
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use common::Size;
    use engine::{
        content::{ContentLoader, StaticLoader},
        surface::{ElementKind, Surface},
        Host,
    };
    use web_time::{Duration, Instant};

    use super::*;
    use crate::scenes::{
        desktop::{CONTENT_PLACEHOLDER, DOCK_ICONS, GRID_ICONS},
        ContentPage,
    };

    fn pages() -> StaticLoader {
        ContentPage::ALL
            .into_iter()
            .fold(StaticLoader::new(), |loader, page| {
                loader.with_page(page.source(), &format!("<h1>{:?}</h1>", page))
            })
    }

    fn host(app: LaviOs, loader: impl ContentLoader + 'static) -> Host {
        Host::new(
            app,
            Size::new(1280., 720.),
            loader,
            Duration::from_millis(500),
        )
    }

    fn click_icon(host: &mut Host, icon: &str) {
        let element = host
            .surface()
            .elements()
            .find(|element| {
                element.kind()
                    == &ElementKind::Image {
                        source: icon.into(),
                    }
            })
            .map(|element| element.bounds())
            .unwrap();

        host.click(element.position + glam::vec2(1., 1.));
    }

    #[test]
    fn callbacks_report_successors() {
        let mut os = LaviOs::new();
        let _login = os.first_scene();

        let mut login = os.callback(SceneKind::Login);
        login(None);
        assert!(os.next_scene().is_some());
        assert_eq!(os.current(), SceneKind::Matrix);

        // The last request wins
        let mut desktop = os.callback(SceneKind::Desktop);
        desktop(Some("img/education.png"));
        desktop(Some("img/browser.png"));
        assert!(os.next_scene().is_some());
        assert_eq!(os.current(), SceneKind::Page(ContentPage::Browser));

        assert!(os.next_scene().is_none());
    }

    #[test]
    fn boots_from_login_to_desktop() {
        let mut host = host(LaviOs::new(), pages());
        let now = Instant::now();

        host.draw(now);
        let input = host
            .surface()
            .elements()
            .find(|element| element.kind() == &ElementKind::Input)
            .map(|element| element.bounds())
            .unwrap();

        host.click(input.position + glam::vec2(2., 2.));
        (0..10).for_each(|_| host.type_text("x"));
        assert_eq!(host.generation(), 1);

        // Matrix reveals the whole script, then the bar fills in 50 frames
        let mut frames = 0;
        while host.generation() == 1 && frames < 1000 {
            host.draw(now);
            frames += 1;
        }
        assert_eq!(host.generation(), 2);

        (0..50).for_each(|_| host.draw(now));
        assert_eq!(host.generation(), 3);

        host.draw(now);
        let images = host
            .surface()
            .elements()
            .filter(|element| matches!(element.kind(), ElementKind::Image { .. }))
            .count();
        assert_eq!(images, DOCK_ICONS.len() + GRID_ICONS.len() + 1);
    }

    #[test]
    fn desktop_opens_and_closes_pages() {
        let mut host = host(LaviOs::starting_at(SceneKind::Desktop), pages());
        let now = Instant::now();
        host.draw(now);

        click_icon(&mut host, "img/about.png");
        assert_eq!(host.generation(), 1);

        host.draw(now);
        host.poll(now);

        let panel = host
            .surface()
            .elements()
            .find(|element| element.html() == "<h1>About</h1>");
        assert!(panel.is_some());

        // The close box sits on top of the panel corner
        let close = host
            .surface()
            .elements()
            .find(|element| element.html() == "✕")
            .map(|element| element.bounds())
            .unwrap();
        host.click(close.position + glam::vec2(5., 5.));
        assert_eq!(host.generation(), 2);

        host.draw(now);
        assert!(host
            .surface()
            .elements()
            .all(|element| element.html() != "<h1>About</h1>"));
    }

    #[test]
    fn unknown_dock_icon_reopens_desktop() {
        let mut host = host(LaviOs::starting_at(SceneKind::Desktop), pages());
        let now = Instant::now();
        host.draw(now);

        click_icon(&mut host, "img/lavilogo.png");
        assert_eq!(host.generation(), 1);

        host.draw(now);
        assert_eq!(
            host.surface().elements().count(),
            DOCK_ICONS.len() + GRID_ICONS.len() + 2
        );
    }

    #[test]
    fn missing_page_shows_placeholder() {
        let mut host = host(
            LaviOs::starting_at(SceneKind::Page(ContentPage::Education)),
            StaticLoader::new(),
        );
        let now = Instant::now();

        host.draw(now);
        host.poll(now);

        assert!(host
            .surface()
            .elements()
            .any(|element| element.html() == CONTENT_PLACEHOLDER));
    }

    #[test]
    fn debounced_resize_rebuilds_window() {
        let mut host = host(
            LaviOs::starting_at(SceneKind::Page(ContentPage::About)),
            pages(),
        );
        let start = Instant::now();
        host.draw(start);

        (0..5).for_each(|step| {
            host.request_resize(Size::new(1000. + step as f32 * 10., 700.), start);
        });
        assert_eq!(host.pending_resizes(), 1);

        assert_eq!(
            host.poll(start + Duration::from_millis(500)),
            Some(Size::new(1040., 700.))
        );
        host.draw(start + Duration::from_millis(500));
        host.poll(start + Duration::from_millis(500));

        assert_eq!(host.surface().size(), Size::new(1040., 700.));
        assert!(host
            .surface()
            .elements()
            .any(|element| element.html() == "<h1>About</h1>"));
    }
}

//====================================================================
