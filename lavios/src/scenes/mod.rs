//====================================================================

use engine::{
    scene::{CommandError, Commands, Frame, Layout, Scene},
    surface::Surface,
};

pub mod booting;
pub mod desktop;
pub mod login;
pub mod matrix;

//====================================================================

/// Invoked by a scene once it is done. Desktop scenes pass the identifier of
/// the activated icon, every other scene passes `None`.
pub type TransitionCallback = Box<dyn FnMut(Option<&str>)>;

/// Fire-once wrapper around a `TransitionCallback`.
pub struct Transition {
    callback: TransitionCallback,
    fired: bool,
}

impl Transition {
    #[inline]
    pub fn new(callback: TransitionCallback) -> Self {
        Self {
            callback,
            fired: false,
        }
    }

    /// Returns false when the scene already signalled before.
    pub fn fire(&mut self, argument: Option<&str>) -> bool {
        if self.fired {
            log::trace!("Ignoring repeated transition {:?}", argument);
            return false;
        }

        log::debug!("Scene finished with {:?}", argument);

        self.fired = true;
        (self.callback)(argument);
        true
    }

    #[inline]
    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

//====================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentPage {
    About,
    Browser,
    Experiences,
    Education,
    Projects,
}

impl ContentPage {
    pub const ALL: [ContentPage; 5] = [
        ContentPage::About,
        ContentPage::Browser,
        ContentPage::Experiences,
        ContentPage::Education,
        ContentPage::Projects,
    ];

    /// Icon that opens this page, doubling as its routing key.
    pub fn icon(&self) -> &'static str {
        match self {
            ContentPage::About => "img/about.png",
            ContentPage::Browser => "img/browser.png",
            ContentPage::Experiences => "img/experiences.png",
            ContentPage::Education => "img/education.png",
            ContentPage::Projects => "img/projects.png",
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            ContentPage::About => "htmlLayouts/about.html",
            ContentPage::Browser => "htmlLayouts/browser.html",
            ContentPage::Experiences => "htmlLayouts/experiences.html",
            ContentPage::Education => "htmlLayouts/education.html",
            ContentPage::Projects => "htmlLayouts/projects.html",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            ContentPage::About => "aboutWindow",
            ContentPage::Browser => "browserWindow",
            ContentPage::Experiences => "experienceWindow",
            ContentPage::Education => "educationWindow",
            ContentPage::Projects => "projectsWindow",
        }
    }

    #[inline]
    pub fn from_icon(icon: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.icon() == icon)
    }
}

//====================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Login,
    Matrix,
    Booting,
    Desktop,
    Page(ContentPage),
    Blank,
}

impl SceneKind {
    /// Unknown identifiers map to the blank scene.
    pub fn from_id(id: &str) -> Self {
        match id {
            "login" => SceneKind::Login,
            "matrix" => SceneKind::Matrix,
            "booting" => SceneKind::Booting,
            "desktop" => SceneKind::Desktop,
            _ => ContentPage::ALL
                .into_iter()
                .find(|page| page.id() == id)
                .map(SceneKind::Page)
                .unwrap_or(SceneKind::Blank),
        }
    }
}

/// Scene to open for an activated desktop icon. Closing a window (no icon)
/// and unknown icons lead back to the plain desktop.
pub fn route_icon(icon: Option<&str>) -> SceneKind {
    icon.and_then(ContentPage::from_icon)
        .map(SceneKind::Page)
        .unwrap_or(SceneKind::Desktop)
}

/// The application state machine: which scene follows `kind` when it
/// signals with `argument`.
pub fn successor(kind: SceneKind, argument: Option<&str>) -> SceneKind {
    match kind {
        SceneKind::Login => SceneKind::Matrix,
        SceneKind::Matrix => SceneKind::Booting,
        SceneKind::Booting => SceneKind::Desktop,
        SceneKind::Desktop | SceneKind::Page(_) => route_icon(argument),
        SceneKind::Blank => SceneKind::Blank,
    }
}

//====================================================================

/// Scene factory.
pub fn build(kind: SceneKind, callback: TransitionCallback) -> Box<dyn Scene> {
    log::debug!("Building {:?} scene", kind);

    let transition = Transition::new(callback);

    match kind {
        SceneKind::Login => Box::new(login::login(transition)),
        SceneKind::Matrix => Box::new(matrix::matrix(transition)),
        SceneKind::Booting => Box::new(booting::booting(transition)),
        SceneKind::Desktop => Box::new(desktop::desktop(transition)),
        SceneKind::Page(page) => Box::new(desktop::window(page, transition)),
        SceneKind::Blank => Box::new(blank()),
    }
}

#[inline]
pub fn build_id(id: &str, callback: TransitionCallback) -> Box<dyn Scene> {
    build(SceneKind::from_id(id), callback)
}

//====================================================================

/// Draws nothing and never transitions.
pub struct Blank;

impl Commands for Blank {
    type Command = std::convert::Infallible;

    fn execute(
        &mut self,
        command: &Self::Command,
        _surface: &mut dyn Surface,
        _frame: &Frame,
    ) -> Result<(), CommandError> {
        match *command {}
    }
}

#[inline]
pub fn blank() -> Layout<Blank> {
    Layout::new(Blank)
}

//====================================================================

#[cfg(test)]
pub(crate) mod tests {
    use std::{cell::RefCell, rc::Rc};

    use common::Size;
    use engine::retained::RetainedSurface;

    use super::*;

    /// Callback recording every argument it receives.
    pub(crate) fn recorder() -> (TransitionCallback, Rc<RefCell<Vec<Option<String>>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let inner = calls.clone();

        let callback: TransitionCallback = Box::new(move |argument: Option<&str>| {
            inner.borrow_mut().push(argument.map(str::to_string))
        });

        (callback, calls)
    }

    pub(crate) fn surface() -> RetainedSurface {
        RetainedSurface::new(Size::new(1280., 720.))
    }

    #[test]
    fn transition_fires_once() {
        let (callback, calls) = recorder();
        let mut transition = Transition::new(callback);

        assert!(!transition.has_fired());
        assert!(transition.fire(Some("img/about.png")));
        assert!(!transition.fire(None));
        assert!(transition.has_fired());

        assert_eq!(*calls.borrow(), vec![Some("img/about.png".to_string())]);
    }

    #[test]
    fn scene_ids_resolve() {
        assert_eq!(SceneKind::from_id("login"), SceneKind::Login);
        assert_eq!(SceneKind::from_id("booting"), SceneKind::Booting);
        assert_eq!(
            SceneKind::from_id("experienceWindow"),
            SceneKind::Page(ContentPage::Experiences)
        );
        assert_eq!(SceneKind::from_id("musicWindow"), SceneKind::Blank);
        assert_eq!(SceneKind::from_id(""), SceneKind::Blank);
    }

    #[test]
    fn icons_route_to_pages() {
        ContentPage::ALL.into_iter().for_each(|page| {
            assert_eq!(route_icon(Some(page.icon())), SceneKind::Page(page));
        });

        assert_eq!(route_icon(Some("img/lavilogo.png")), SceneKind::Desktop);
        assert_eq!(route_icon(Some("img/music.png")), SceneKind::Desktop);
        assert_eq!(route_icon(None), SceneKind::Desktop);
    }

    #[test]
    fn state_machine_walks_the_boot_sequence() {
        let mut kind = SceneKind::Login;
        let mut visited = vec![kind];

        (0..3).for_each(|_| {
            kind = successor(kind, None);
            visited.push(kind);
        });

        assert_eq!(
            visited,
            vec![
                SceneKind::Login,
                SceneKind::Matrix,
                SceneKind::Booting,
                SceneKind::Desktop
            ]
        );

        let page = successor(SceneKind::Desktop, Some("img/projects.png"));
        assert_eq!(page, SceneKind::Page(ContentPage::Projects));

        // Closing returns to the desktop, dock icons inside a window still route
        assert_eq!(successor(page, None), SceneKind::Desktop);
        assert_eq!(
            successor(page, Some("img/about.png")),
            SceneKind::Page(ContentPage::About)
        );
        assert_eq!(successor(SceneKind::Blank, None), SceneKind::Blank);
    }

    #[test]
    fn unknown_id_builds_inert_scene() {
        let (callback, calls) = recorder();
        let mut scene = build_id("nothing", callback);
        let mut surface = surface();

        (0..10).for_each(|_| scene.draw(&mut surface));

        assert_eq!(surface.elements().count(), 0);
        assert!(surface.canvas().is_empty());
        assert!(calls.borrow().is_empty());
    }
}

//====================================================================
