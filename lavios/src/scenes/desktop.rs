//====================================================================

use chrono::{DateTime, Local, TimeZone};
use common::Color;
use engine::{
    content::ContentResponse,
    scene::{CommandError, Commands, Frame, Layout},
    surface::{ElementId, EventKind, Surface, UiEvent},
    timer::Interval,
};
use web_time::{Duration, Instant};

use super::{ContentPage, Transition};

//====================================================================

const SPACER: f32 = 30.;
const ICON_SIZE: f32 = 60.;
const BOTTOM_BAR_SIZE: f32 = 75.;
const GRID_SPACER: f32 = 30.;

const CLOCK_PERIOD: Duration = Duration::from_millis(500);
const CLOCK_FORMAT: &str = "%a %b %d %Y %H:%M:%S";

const WALLPAPER: &str = "img/purplebackground.jpg";

pub const DOCK_ICONS: [&str; 3] = ["img/lavilogo.png", "img/about.png", "img/projects.png"];
pub const GRID_ICONS: [&str; 3] = [
    "img/experiences.png",
    "img/browser.png",
    "img/education.png",
];

// Content window placement
const WINDOW_X: f32 = 100.;
const WINDOW_Y: f32 = 20.;
const WINDOW_MARGIN: f32 = 20.;
const CLOSE_SIZE: f32 = 30.;
const CLOSE_Z_INDEX: i32 = 999;

pub const CONTENT_PLACEHOLDER: &str = "Unable to load content.";

//====================================================================

#[inline]
pub fn clock_text<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format(CLOCK_FORMAT).to_string()
}

/// How many grid icons fit in one column above the bottom bar.
pub fn column_capacity(height: f32) -> usize {
    let capacity = ((height - BOTTOM_BAR_SIZE) / (GRID_SPACER + ICON_SIZE)).floor();
    (capacity.max(0.) as usize).max(1)
}

//====================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum DesktopCommand {
    Dock,
    Grid,
    Clock,
    BottomBar,

    PanelDimensions,
    CloseBox,
    Panel,
    LoadContent(String),
}

/// Content window state, present when the desktop hosts a page.
#[derive(Debug, Default)]
pub struct Panel {
    width: f32,
    height: f32,

    element: Option<ElementId>,
    close: Option<ElementId>,

    sequence: u64,
    latest: Option<u64>,
}

impl Panel {
    #[inline]
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    #[inline]
    pub fn close(&self) -> Option<ElementId> {
        self.close
    }

    /// Sequence of the newest content request, the only one applied.
    #[inline]
    pub fn latest(&self) -> Option<u64> {
        self.latest
    }
}

/// The desktop: dock, icon grid, clock and bottom bar, optionally with a
/// content window on top.
pub struct Desktop {
    transition: Transition,

    icons: Vec<(ElementId, &'static str)>,
    clock: Option<ElementId>,
    clock_timer: Interval,

    panel: Option<Panel>,
}

pub fn desktop(transition: Transition) -> Layout<Desktop> {
    let mut layout = Layout::new(Desktop {
        transition,
        icons: Vec::new(),
        clock: None,
        clock_timer: Interval::new(CLOCK_PERIOD),
        panel: None,
    });

    layout.push(DesktopCommand::Dock);
    layout.push(DesktopCommand::Grid);
    layout.push(DesktopCommand::Clock);
    layout.push_frame(DesktopCommand::BottomBar);
    layout
}

/// A desktop with a content window showing `page`.
pub fn window(page: ContentPage, transition: Transition) -> Layout<Desktop> {
    let mut layout = desktop(transition);
    layout.commands_mut().panel = Some(Panel::default());

    layout.push(DesktopCommand::PanelDimensions);
    layout.push(DesktopCommand::CloseBox);
    layout.push(DesktopCommand::Panel);
    layout.load_content(page.source());
    layout
}

pub trait LoadContent {
    /// Fetch `source` into the content panel every time the layout is rebuilt.
    fn load_content(&mut self, source: &str);
}

impl LoadContent for Layout<Desktop> {
    #[inline]
    fn load_content(&mut self, source: &str) {
        self.push(DesktopCommand::LoadContent(source.to_string()));
    }
}

//====================================================================

impl Desktop {
    #[inline]
    pub fn icons(&self) -> &[(ElementId, &'static str)] {
        &self.icons
    }

    #[inline]
    pub fn clock(&self) -> Option<ElementId> {
        self.clock
    }

    /// Live clock timers, at most one.
    #[inline]
    pub fn clock_timers(&self) -> usize {
        self.clock_timer.pending()
    }

    #[inline]
    pub fn panel(&self) -> Option<&Panel> {
        self.panel.as_ref()
    }

    fn panel_mut(&mut self) -> Result<&mut Panel, CommandError> {
        self.panel
            .as_mut()
            .ok_or_else(|| CommandError::Failed("Desktop has no content panel".into()))
    }

    fn icon(
        &mut self,
        surface: &mut dyn Surface,
        source: &'static str,
        x: f32,
        y: f32,
    ) -> Result<(), CommandError> {
        let id = surface.create_img(source);
        surface
            .get(id)?
            .set_position(x, y)
            .set_size(ICON_SIZE, ICON_SIZE)
            .add_class("icon")
            .listen(EventKind::Click);

        self.icons.push((id, source));
        Ok(())
    }

    /// Forget icons whose elements were removed with the last rebuild.
    fn prune_icons(&mut self, surface: &dyn Surface) {
        self.icons.retain(|(id, _)| surface.element(*id).is_some());
    }

    fn dock(&mut self, surface: &mut dyn Surface) -> Result<(), CommandError> {
        self.prune_icons(surface);
        let size = surface.size();

        let y = size.height - BOTTOM_BAR_SIZE + (BOTTOM_BAR_SIZE - ICON_SIZE) / 2.;
        let mut tracker = SPACER;

        for icon in DOCK_ICONS {
            self.icon(surface, icon, tracker, y)?;
            tracker += ICON_SIZE + SPACER;
        }

        let wallpaper = surface.create_img(WALLPAPER);
        let wallpaper = surface.get(wallpaper)?;
        wallpaper.style_mut().z_index = -1;
        wallpaper
            .set_position(0., 0.)
            .set_size(size.width, size.height - BOTTOM_BAR_SIZE);

        Ok(())
    }

    fn grid(&mut self, surface: &mut dyn Surface) -> Result<(), CommandError> {
        self.prune_icons(surface);
        let capacity = column_capacity(surface.size().height);

        let (mut x, mut y) = (GRID_SPACER, GRID_SPACER);

        for (index, icon) in GRID_ICONS.into_iter().enumerate() {
            if index > 0 && index % capacity == 0 {
                y = GRID_SPACER;
                x += ICON_SIZE + GRID_SPACER;
            }

            self.icon(surface, icon, x, y)?;
            y += ICON_SIZE + GRID_SPACER;
        }

        Ok(())
    }

    fn clock_element(&mut self, surface: &mut dyn Surface) -> Result<(), CommandError> {
        let size = surface.size();

        let id = surface.create_p(&clock_text(&Local::now()));
        surface
            .get(id)?
            .set_position(size.width - 200., size.height - BOTTOM_BAR_SIZE / 2. - 9.)
            .set_size(180., 18.);

        self.clock = Some(id);
        self.clock_timer.arm(surface.now());
        Ok(())
    }

    fn bottom_bar(&mut self, surface: &mut dyn Surface) {
        let size = surface.size();

        surface.push();
        surface.rect(
            0.,
            size.height - BOTTOM_BAR_SIZE,
            size.width,
            BOTTOM_BAR_SIZE,
        );
        surface.pop();
    }

    fn panel_dimensions(&mut self, surface: &mut dyn Surface) -> Result<(), CommandError> {
        let size = surface.size();
        let panel = self.panel_mut()?;

        panel.width = size.width - WINDOW_X - WINDOW_MARGIN;
        panel.height = size.height - (BOTTOM_BAR_SIZE + WINDOW_Y + WINDOW_MARGIN);
        Ok(())
    }

    fn close_box(&mut self, surface: &mut dyn Surface) -> Result<(), CommandError> {
        let width = self.panel_mut()?.width;

        let id = surface.create_div();
        let close = surface.get(id)?;
        close.style_mut().z_index = CLOSE_Z_INDEX;
        close
            .set_position(WINDOW_X + width - CLOSE_SIZE, WINDOW_Y + 2.)
            .set_size(CLOSE_SIZE, CLOSE_SIZE)
            .set_html("✕")
            .add_class("xIcon")
            .listen(EventKind::Click);

        self.panel_mut()?.close = Some(id);
        Ok(())
    }

    fn panel_element(&mut self, surface: &mut dyn Surface) -> Result<(), CommandError> {
        let (width, height) = {
            let panel = self.panel_mut()?;
            (panel.width, panel.height)
        };

        let id = surface.create_div();
        let element = surface.get(id)?;
        element.style_mut().background = Some(Color::LIGHT_BLUE);
        element
            .set_position(WINDOW_X, WINDOW_Y)
            .set_size(width, height);

        self.panel_mut()?.element = Some(id);
        Ok(())
    }

    fn load(&mut self, surface: &mut dyn Surface, source: &str) -> Result<(), CommandError> {
        let panel = self.panel_mut()?;

        panel.sequence += 1;
        panel.latest = Some(panel.sequence);

        log::debug!("Requesting '{}' as load {}", source, panel.sequence);
        surface.fetch(source, panel.sequence);
        Ok(())
    }
}

impl Commands for Desktop {
    type Command = DesktopCommand;

    fn execute(
        &mut self,
        command: &DesktopCommand,
        surface: &mut dyn Surface,
        _frame: &Frame,
    ) -> Result<(), CommandError> {
        match command {
            DesktopCommand::Dock => self.dock(surface),
            DesktopCommand::Grid => self.grid(surface),
            DesktopCommand::Clock => self.clock_element(surface),
            DesktopCommand::BottomBar => {
                self.bottom_bar(surface);
                Ok(())
            }
            DesktopCommand::PanelDimensions => self.panel_dimensions(surface),
            DesktopCommand::CloseBox => self.close_box(surface),
            DesktopCommand::Panel => self.panel_element(surface),
            DesktopCommand::LoadContent(source) => self.load(surface, source),
        }
    }

    fn event(&mut self, _surface: &mut dyn Surface, event: &UiEvent) -> Result<(), CommandError> {
        let UiEvent::Click(id) = event else {
            return Ok(());
        };

        if let Some(panel) = &self.panel {
            if panel.close == Some(*id) {
                self.transition.fire(None);
                return Ok(());
            }
        }

        let icon = self
            .icons
            .iter()
            .find(|(icon_id, _)| icon_id == id)
            .map(|(_, icon)| *icon);

        if let Some(icon) = icon {
            self.transition.fire(Some(icon));
        }

        Ok(())
    }

    fn poll(&mut self, surface: &mut dyn Surface, now: Instant) -> Result<(), CommandError> {
        if !self.clock_timer.poll(now) {
            return Ok(());
        }

        match self.clock {
            Some(id) => {
                surface.get(id)?.set_html(clock_text(&Local::now()));
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn content(
        &mut self,
        surface: &mut dyn Surface,
        response: ContentResponse,
    ) -> Result<(), CommandError> {
        let panel = self.panel_mut()?;

        if panel.latest != Some(response.sequence) {
            log::debug!(
                "Dropping load {} of '{}', waiting for {:?}",
                response.sequence,
                response.source,
                panel.latest
            );
            return Ok(());
        }

        let Some(id) = panel.element else {
            return Ok(());
        };

        let markup = match response.result {
            Ok(markup) => markup,
            Err(e) => {
                log::warn!("Unable to load '{}': {}", response.source, e);
                CONTENT_PLACEHOLDER.to_string()
            }
        };

        surface.get(id)?.set_html(markup);
        Ok(())
    }
}

//====================================================================


//====================================================================
