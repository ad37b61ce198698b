//====================================================================

use common::Color;
use engine::{
    scene::{CommandError, Commands, Frame, Layout},
    surface::Surface,
};

use super::Transition;

//====================================================================

const PROGRESS_SPEED: u32 = 4;
const TRACK_LENGTH: f32 = 200.;
const TRACK_HEIGHT: f32 = 20.;
const LABEL_FONT_SIZE: f32 = 32.;

pub enum BootingCommand {
    Label,
    ProgressBar,
}

pub struct Booting {
    transition: Transition,
}

pub fn booting(transition: Transition) -> Layout<Booting> {
    let mut layout = Layout::new(Booting { transition })
        .with_background(Color::GRAY)
        .with_frame_step(PROGRESS_SPEED);

    layout.push(BootingCommand::Label);
    layout.push_frame(BootingCommand::ProgressBar);
    layout
}

impl Booting {
    fn label(&mut self, surface: &mut dyn Surface) -> Result<(), CommandError> {
        let size = surface.size();

        let label = surface.create_p("Loading LaviOS...");
        let label = surface.get(label)?;
        label.style_mut().font_size = LABEL_FONT_SIZE;

        let offset = label.offset_size();
        label.set_position(
            size.width / 2. - offset.width / 2.,
            size.height / 2. - offset.height,
        );

        Ok(())
    }

    fn progress_bar(&mut self, surface: &mut dyn Surface, frame: &Frame) {
        let progress = frame.count as f32;

        if progress >= TRACK_LENGTH {
            self.transition.fire(None);
            return;
        }

        let size = surface.size();
        let (x, y) = (size.width / 2. - TRACK_LENGTH / 2., size.height / 2.);

        surface.push();
        surface.rect(x, y, TRACK_LENGTH, TRACK_HEIGHT);
        surface.fill(Color::BLUE);
        surface.rect(x, y, progress, TRACK_HEIGHT);
        surface.pop();
    }
}

impl Commands for Booting {
    type Command = BootingCommand;

    fn execute(
        &mut self,
        command: &BootingCommand,
        surface: &mut dyn Surface,
        frame: &Frame,
    ) -> Result<(), CommandError> {
        match command {
            BootingCommand::Label => self.label(surface),
            BootingCommand::ProgressBar => {
                self.progress_bar(surface, frame);
                Ok(())
            }
        }
    }
}

//====================================================================


//====================================================================
