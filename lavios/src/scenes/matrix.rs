//====================================================================

use common::Color;
use engine::{
    scene::{CommandError, Commands, Frame, Layout},
    surface::{FontFamily, Surface},
};

use super::Transition;

//====================================================================

/// Characters revealed per drawn frame.
const REVEAL_SPEED: u32 = 6;
const LEFT_MARGIN: f32 = 20.;
const TOP_MARGIN: f32 = 20.;
const LINE_COLOR: Color = Color::GREEN;

pub const SCRIPT: [&str; 20] = [
    "> ssh 219.1.111.65",
    "> cd master",
    "Enter Password: ",
    "> •••••••••••",
    "Permission Denied",
    "> npm install git",
    "> git pull jacktheripper",
    "> 1233014002",
    "> load jacktheripper > master",
    "Cracking..............Cracked!",
    "Permission Granted",
    "> ./virtualportfolio",
    "Welcome to LaviOS!",
    "Accessing Pirjot Atwal's Virtual Portfolio Desktop",
    ".................................................",
    ".................................................",
    "Previous Login Session Corrupted (╯°□°)╯︵ ┻━┻ ",
    "Entering Boot State Momentarily",
    "................................................",
    "................................................",
];

//====================================================================

/// How far into `script` a reveal of `count` characters got: the number of
/// complete lines and the characters shown of the line after them. `None`
/// once everything is revealed.
pub fn reveal<S: AsRef<str>>(script: &[S], count: usize) -> Option<(usize, usize)> {
    let mut cumulative = 0;

    script.iter().enumerate().find_map(|(index, line)| {
        let prior = cumulative;
        cumulative += line.as_ref().chars().count();

        match count < cumulative {
            true => Some((index, count - prior)),
            false => None,
        }
    })
}

//====================================================================

pub enum MatrixCommand {
    Reveal,
}

pub struct Matrix {
    transition: Transition,
    script: Vec<String>,
    line_spacer: f32,
}

#[inline]
pub fn matrix(transition: Transition) -> Layout<Matrix> {
    matrix_with_script(transition, SCRIPT.iter().map(|line| line.to_string()).collect())
}

pub fn matrix_with_script(transition: Transition, script: Vec<String>) -> Layout<Matrix> {
    let mut layout = Layout::new(Matrix {
        transition,
        script,
        line_spacer: TOP_MARGIN,
    })
    .with_background(Color::BLACK)
    .with_frame_step(REVEAL_SPEED);

    layout.push_frame(MatrixCommand::Reveal);
    layout
}

impl Matrix {
    #[inline]
    pub fn script(&self) -> &[String] {
        &self.script
    }

    fn reveal(&mut self, surface: &mut dyn Surface, frame: &Frame) -> Result<(), CommandError> {
        surface.remove_elements();

        if frame.resized {
            self.line_spacer = TOP_MARGIN;
        }

        let Some((complete, partial)) = reveal(&self.script, frame.count as usize) else {
            self.transition.fire(None);
            return Ok(());
        };

        let mut spacer = self.line_spacer;

        let lines = self.script[..complete]
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.script[complete].as_str()));

        for (index, line) in lines.enumerate() {
            let text = match index == complete {
                true => line.chars().take(partial).collect::<String>(),
                false => line.to_string(),
            };

            let id = surface.create_p(&text);
            let element = surface.get(id)?;

            let style = element.style_mut();
            style.color = LINE_COLOR;
            style.font_family = FontFamily::Monospace;

            element.set_position(LEFT_MARGIN, spacer);
            spacer += element.offset_size().height;
        }

        Ok(())
    }
}

impl Commands for Matrix {
    type Command = MatrixCommand;

    fn execute(
        &mut self,
        command: &MatrixCommand,
        surface: &mut dyn Surface,
        frame: &Frame,
    ) -> Result<(), CommandError> {
        match command {
            MatrixCommand::Reveal => self.reveal(surface, frame),
        }
    }
}

//====================================================================


//====================================================================
