//====================================================================

use common::Color;
use engine::{
    scene::{CommandError, Commands, Frame, Layout},
    surface::{ElementId, EventKind, Surface, UiEvent},
};

use super::Transition;

//====================================================================

const PASSWORD_THRESHOLD: usize = 10;

const LOGO_SIZE: f32 = 100.;
const INPUT_WIDTH: f32 = 200.;
const HINT_WIDTH: f32 = 231.;
const HEADER_FONT_SIZE: f32 = 32.;

pub enum LoginCommand {
    Elements,
}

pub struct Login {
    transition: Transition,
    threshold: usize,
    input: Option<ElementId>,
}

pub fn login(transition: Transition) -> Layout<Login> {
    let mut layout = Layout::new(Login {
        transition,
        threshold: PASSWORD_THRESHOLD,
        input: None,
    })
    .with_background(Color::GRAY);

    layout.push(LoginCommand::Elements);
    layout
}

impl Login {
    #[inline]
    pub fn input(&self) -> Option<ElementId> {
        self.input
    }

    fn elements(&mut self, surface: &mut dyn Surface) -> Result<(), CommandError> {
        let size = surface.size();
        let (center_x, center_y) = (size.width / 2., size.height / 2.);

        let logo = surface.create_img("img/lavilogo.png");
        surface
            .get(logo)?
            .set_position(center_x - LOGO_SIZE / 2., center_y - 150.)
            .set_size(LOGO_SIZE, LOGO_SIZE);

        let guest = surface.create_p("Guest");
        let guest = surface.get(guest)?;
        guest.style_mut().font_size = HEADER_FONT_SIZE;
        let offset = guest.offset_size();
        guest.set_position(center_x - offset.width / 2., center_y - offset.height);

        let input = surface.create_input("");
        let element = surface.get(input)?;
        element.style_mut().padding = 5.;
        element
            .set_placeholder("Password")
            .set_password(true)
            .set_width(INPUT_WIDTH)
            .listen(EventKind::KeyUp);
        let offset = element.offset_size();
        element.set_position(center_x - offset.width / 2., center_y + 20.);
        self.input = Some(input);

        let hint = surface.create_p("Hint: Type random keys to proceed!");
        let hint = surface.get(hint)?;
        hint.set_width(HINT_WIDTH);
        let offset = hint.offset_size();
        hint.set_position(center_x - offset.width / 2., center_y + 70.);

        Ok(())
    }
}

impl Commands for Login {
    type Command = LoginCommand;

    fn execute(
        &mut self,
        command: &LoginCommand,
        surface: &mut dyn Surface,
        _frame: &Frame,
    ) -> Result<(), CommandError> {
        match command {
            LoginCommand::Elements => self.elements(surface),
        }
    }

    fn event(&mut self, surface: &mut dyn Surface, event: &UiEvent) -> Result<(), CommandError> {
        let UiEvent::KeyUp(id) = event else {
            return Ok(());
        };

        if self.input != Some(*id) {
            return Ok(());
        }

        let length = surface.get(*id)?.value().chars().count();
        if length >= self.threshold {
            self.transition.fire(None);
        }

        Ok(())
    }
}

//====================================================================


//====================================================================
