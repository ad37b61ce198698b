//====================================================================

use std::{error::Error, fmt::Display};

use common::{Color, Size};
use web_time::Instant;

use crate::{
    content::ContentResponse,
    surface::{ElementId, Surface, UiEvent},
};

//====================================================================

pub trait Scene: 'static {
    /// Called once per animation frame, never re-entrantly.
    fn draw(&mut self, surface: &mut dyn Surface);

    fn event(&mut self, surface: &mut dyn Surface, event: &UiEvent) {
        let _ = (surface, event);
    }

    /// Timer side channel, driven independently of `draw`.
    fn poll(&mut self, surface: &mut dyn Surface, now: Instant) {
        let _ = (surface, now);
    }

    fn content(&mut self, surface: &mut dyn Surface, response: ContentResponse) {
        let _ = (surface, response);
    }
}

//====================================================================

#[derive(Debug)]
pub enum CommandError {
    MissingElement(ElementId),
    Failed(String),
}

impl Error for CommandError {}

impl Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::MissingElement(id) => {
                write!(f, "Element {} no longer exists on the surface", id)
            }
            CommandError::Failed(msg) => write!(f, "Command failed: {}", msg),
        }
    }
}

//====================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub count: u32,
    pub resized: bool,
}

/// The state a `Layout` drives. Commands are plain values interpreted by
/// `execute`, so all state they touch lives in named fields of the implementor.
pub trait Commands: 'static {
    type Command: 'static;

    fn execute(
        &mut self,
        command: &Self::Command,
        surface: &mut dyn Surface,
        frame: &Frame,
    ) -> Result<(), CommandError>;

    fn event(&mut self, surface: &mut dyn Surface, event: &UiEvent) -> Result<(), CommandError> {
        let _ = (surface, event);
        Ok(())
    }

    fn poll(&mut self, surface: &mut dyn Surface, now: Instant) -> Result<(), CommandError> {
        let _ = (surface, now);
        Ok(())
    }

    fn content(
        &mut self,
        surface: &mut dyn Surface,
        response: ContentResponse,
    ) -> Result<(), CommandError> {
        let _ = (surface, response);
        Ok(())
    }
}

//====================================================================

pub struct Layout<C: Commands> {
    frame_commands: Vec<C::Command>,
    resize_commands: Vec<C::Command>,

    frame_count: u32,
    frame_step: u32,
    background: Option<Color>,
    last_size: Option<Size<f32>>,

    commands: C,
}

impl<C: Commands> Layout<C> {
    pub fn new(commands: C) -> Self {
        Self {
            frame_commands: Vec::new(),
            resize_commands: Vec::new(),
            frame_count: 0,
            frame_step: 1,
            background: None,
            last_size: None,
            commands,
        }
    }

    #[inline]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Amount the frame counter advances per `draw`.
    #[inline]
    pub fn with_frame_step(mut self, step: u32) -> Self {
        self.frame_step = step;
        self
    }

    #[inline]
    pub fn push(&mut self, command: C::Command) {
        self.resize_commands.push(command);
    }

    #[inline]
    pub fn push_frame(&mut self, command: C::Command) {
        self.frame_commands.push(command);
    }

    #[inline]
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    #[inline]
    pub fn last_size(&self) -> Option<Size<f32>> {
        self.last_size
    }

    #[inline]
    pub fn resize_commands(&self) -> &[C::Command] {
        &self.resize_commands
    }

    #[inline]
    pub fn frame_commands(&self) -> &[C::Command] {
        &self.frame_commands
    }

    #[inline]
    pub fn commands(&self) -> &C {
        &self.commands
    }

    #[inline]
    pub fn commands_mut(&mut self) -> &mut C {
        &mut self.commands
    }

    fn run(
        commands: &mut C,
        list: &[C::Command],
        surface: &mut dyn Surface,
        frame: &Frame,
    ) -> Result<(), CommandError> {
        list.iter()
            .try_for_each(|command| commands.execute(command, surface, frame))
    }
}

impl<C: Commands> Scene for Layout<C> {
    fn draw(&mut self, surface: &mut dyn Surface) {
        self.frame_count += self.frame_step;

        if let Some(color) = self.background {
            surface.background(color);
        }

        let size = surface.size();
        let frame = Frame {
            count: self.frame_count,
            resized: self.last_size != Some(size),
        };

        let result = match frame.resized {
            true => {
                log::trace!("Surface size changed to {} - rebuilding elements", size);
                surface.remove_elements();
                Self::run(&mut self.commands, &self.resize_commands, surface, &frame)
            }
            false => Ok(()),
        }
        .and_then(|_| Self::run(&mut self.commands, &self.frame_commands, surface, &frame));

        if let Err(e) = result {
            log::error!("Skipping rest of frame {}: {}", frame.count, e);
        }

        self.last_size = Some(size);
    }

    fn event(&mut self, surface: &mut dyn Surface, event: &UiEvent) {
        if let Err(e) = self.commands.event(surface, event) {
            log::error!("Failed to handle {:?}: {}", event, e);
        }
    }

    fn poll(&mut self, surface: &mut dyn Surface, now: Instant) {
        if let Err(e) = self.commands.poll(surface, now) {
            log::error!("Failed to poll scene timers: {}", e);
        }
    }

    fn content(&mut self, surface: &mut dyn Surface, response: ContentResponse) {
        if let Err(e) = self.commands.content(surface, response) {
            log::error!("Failed to apply loaded content: {}", e);
        }
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retained::RetainedSurface;

    enum Probe {
        Element,
        Shape,
        Fail,
    }

    #[derive(Default)]
    struct Counter {
        resized: u32,
        framed: u32,
        seen_on_resize: Vec<usize>,
    }

    impl Commands for Counter {
        type Command = Probe;

        fn execute(
            &mut self,
            command: &Probe,
            surface: &mut dyn Surface,
            _frame: &Frame,
        ) -> Result<(), CommandError> {
            match command {
                Probe::Element => {
                    self.resized += 1;
                    let count = surface.size().width as usize;
                    self.seen_on_resize.push(count);
                    surface.create_p("resize");
                }
                Probe::Shape => {
                    self.framed += 1;
                    surface.rect(0., 0., 10., 10.);
                }
                Probe::Fail => return Err(CommandError::Failed("probe".into())),
            }
            Ok(())
        }
    }

    fn layout() -> Layout<Counter> {
        let mut layout = Layout::new(Counter::default());
        layout.push(Probe::Element);
        layout.push_frame(Probe::Shape);
        layout
    }

    fn draw(layout: &mut Layout<Counter>, surface: &mut RetainedSurface) {
        surface.begin_frame(Instant::now());
        layout.draw(surface);
    }

    #[test]
    fn resize_commands_run_once_for_stable_size() {
        let mut surface = RetainedSurface::new(Size::new(800., 600.));
        let mut layout = layout();

        assert_eq!(layout.last_size(), None);

        (0..25).for_each(|_| draw(&mut layout, &mut surface));

        assert_eq!(layout.commands().resized, 1);
        assert_eq!(layout.commands().framed, 25);
        assert_eq!(layout.frame_count(), 25);
        assert_eq!(layout.last_size(), Some(Size::new(800., 600.)));
        assert_eq!(surface.elements().count(), 1);
    }

    #[test]
    fn size_change_clears_then_reruns_resize_commands() {
        let mut surface = RetainedSurface::new(Size::new(800., 600.));
        let mut layout = layout();

        (0..3).for_each(|_| draw(&mut layout, &mut surface));
        let first = surface.elements().next().map(|element| element.id());

        surface.resize(Size::new(1024., 768.));
        draw(&mut layout, &mut surface);

        assert_eq!(layout.commands().resized, 2);
        assert_eq!(layout.commands().framed, 4);
        assert_eq!(layout.commands().seen_on_resize, vec![800, 1024]);
        assert_eq!(layout.last_size(), Some(Size::new(1024., 768.)));

        // Only the element from the latest resize pass survives
        let remaining = surface.elements().map(|e| e.id()).collect::<Vec<_>>();
        assert_eq!(remaining.len(), 1);
        assert_ne!(Some(remaining[0]), first);
    }

    #[test]
    fn frame_step_and_background() {
        let mut surface = RetainedSurface::new(Size::new(100., 100.));
        let mut layout = layout().with_frame_step(4).with_background(Color::GRAY);

        (0..50).for_each(|_| draw(&mut layout, &mut surface));

        assert_eq!(layout.frame_count(), 200);
        assert_eq!(surface.clear_color(), Some(Color::GRAY));
    }

    #[test]
    fn failing_command_only_skips_its_frame() {
        let mut surface = RetainedSurface::new(Size::new(100., 100.));
        let mut layout = Layout::new(Counter::default());
        layout.push_frame(Probe::Fail);
        layout.push_frame(Probe::Shape);

        (0..3).for_each(|_| draw(&mut layout, &mut surface));

        assert_eq!(layout.commands().framed, 0);
        assert_eq!(layout.frame_count(), 3);
        assert_eq!(layout.last_size(), Some(Size::new(100., 100.)));
    }
}

//====================================================================
