//====================================================================

use std::fmt::Display;

use common::{Color, Rect, Size};
use web_time::Instant;

use crate::scene::CommandError;

//====================================================================

pub const DEFAULT_FONT_SIZE: f32 = 16.;
pub const LINE_HEIGHT: f32 = 1.2;
const CHAR_WIDTH: f32 = 0.6;
const DEFAULT_IMAGE_SIZE: f32 = 64.;

//====================================================================

/// The rendering and element capabilities a scene draws through.
pub trait Surface {
    fn size(&self) -> Size<f32>;
    fn now(&self) -> Instant;

    fn background(&mut self, color: Color);
    fn push(&mut self);
    fn pop(&mut self);
    fn fill(&mut self, color: Color);
    fn stroke(&mut self, color: Option<Color>);
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    fn remove_elements(&mut self);
    fn create_img(&mut self, source: &str) -> ElementId;
    fn create_p(&mut self, text: &str) -> ElementId;
    fn create_input(&mut self, value: &str) -> ElementId;
    fn create_div(&mut self) -> ElementId;

    fn element(&self, id: ElementId) -> Option<&Element>;
    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element>;

    /// Start loading `source` in the background. The response is handed to
    /// the scene that is current when it resolves, tagged with `sequence`.
    fn fetch(&mut self, source: &str, sequence: u64);

    #[inline]
    fn get(&mut self, id: ElementId) -> Result<&mut Element, CommandError> {
        self.element_mut(id).ok_or(CommandError::MissingElement(id))
    }
}

//====================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u32);

impl Display for ElementId {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ElementKind {
    Image { source: String },
    Paragraph,
    Input,
    Div,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Click,
    KeyUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiEvent {
    Click(ElementId),
    KeyUp(ElementId),
}

impl UiEvent {
    #[inline]
    pub fn element(&self) -> ElementId {
        match self {
            UiEvent::Click(id) | UiEvent::KeyUp(id) => *id,
        }
    }
}

//====================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontFamily {
    #[default]
    SansSerif,
    Monospace,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub font_size: f32,
    pub font_family: FontFamily,
    pub color: Color,
    pub background: Option<Color>,
    pub padding: f32,
    pub z_index: i32,
    pub classes: Vec<String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            font_family: FontFamily::default(),
            color: Color::BLACK,
            background: None,
            padding: 0.,
            z_index: 0,
            classes: Vec::new(),
        }
    }
}

//====================================================================

#[derive(Clone, Debug)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    position: glam::Vec2,
    size: Option<Size<f32>>,
    width: Option<f32>,
    style: Style,

    html: String,
    value: String,
    placeholder: String,
    password: bool,
    listeners: Vec<EventKind>,
}

impl Element {
    pub(crate) fn new(id: ElementId, kind: ElementKind) -> Self {
        Self {
            id,
            kind,
            position: glam::Vec2::ZERO,
            size: None,
            width: None,
            style: Style::default(),
            html: String::new(),
            value: String::new(),
            placeholder: String::new(),
            password: false,
            listeners: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> ElementId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    #[inline]
    pub fn position(&self) -> glam::Vec2 {
        self.position
    }

    #[inline]
    pub fn style(&self) -> &Style {
        &self.style
    }

    #[inline]
    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    #[inline]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    #[inline]
    pub fn is_password(&self) -> bool {
        self.password
    }

    #[inline]
    pub fn listens(&self, kind: EventKind) -> bool {
        self.listeners.contains(&kind)
    }
}

impl Element {
    #[inline]
    pub fn set_position(&mut self, x: f32, y: f32) -> &mut Self {
        self.position = glam::vec2(x, y);
        self
    }

    #[inline]
    pub fn set_size(&mut self, width: f32, height: f32) -> &mut Self {
        self.size = Some(Size::new(width, height));
        self
    }

    /// Fix the width only, leaving the height to the content.
    #[inline]
    pub fn set_width(&mut self, width: f32) -> &mut Self {
        self.width = Some(width);
        self
    }

    #[inline]
    pub fn set_html(&mut self, html: impl Into<String>) -> &mut Self {
        self.html = html.into();
        self
    }

    #[inline]
    pub fn set_value(&mut self, value: impl Into<String>) -> &mut Self {
        self.value = value.into();
        self
    }

    #[inline]
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) -> &mut Self {
        self.placeholder = placeholder.into();
        self
    }

    #[inline]
    pub fn set_password(&mut self, password: bool) -> &mut Self {
        self.password = password;
        self
    }

    #[inline]
    pub fn add_class(&mut self, class: &str) -> &mut Self {
        self.style.classes.push(class.to_string());
        self
    }

    pub fn listen(&mut self, kind: EventKind) -> &mut Self {
        if !self.listens(kind) {
            self.listeners.push(kind);
        }
        self
    }
}

impl Element {
    /// Text as it should be shown: stripped markup for paragraphs and divs,
    /// the (masked) value or placeholder for inputs.
    pub fn display_text(&self) -> String {
        match self.kind {
            ElementKind::Image { .. } => String::new(),
            ElementKind::Paragraph | ElementKind::Div => plain_text(&self.html),
            ElementKind::Input => match (self.value.is_empty(), self.password) {
                (true, _) => self.placeholder.clone(),
                (false, true) => "•".repeat(self.value.chars().count()),
                (false, false) => self.value.clone(),
            },
        }
    }

    /// Rendered size including padding, estimated from the content when no
    /// explicit size was given.
    pub fn offset_size(&self) -> Size<f32> {
        let padding = self.style.padding * 2.;

        if let Some(size) = self.size {
            return Size::new(size.width + padding, size.height + padding);
        }

        if let ElementKind::Image { .. } = self.kind {
            return Size::new(DEFAULT_IMAGE_SIZE, DEFAULT_IMAGE_SIZE);
        }

        let text = self.display_text();
        let line_count = text.lines().count().max(1) as f32;
        let longest = text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as f32;

        let width = self
            .width
            .unwrap_or(longest * self.style.font_size * CHAR_WIDTH);
        let height = line_count * self.style.font_size * LINE_HEIGHT;

        Size::new(width + padding, height + padding)
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        let size = self.offset_size();
        Rect::new(self.position.x, self.position.y, size.width, size.height)
    }
}

//====================================================================

const BLOCK_TAGS: [&str; 12] = [
    "p", "br", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Reduce a markup fragment to readable text: tags are dropped, block level
/// tags break lines and the common entities are decoded.
pub fn plain_text(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut tag = String::new();
    let mut in_tag = false;

    for c in markup.chars() {
        match (in_tag, c) {
            (false, '<') => {
                in_tag = true;
                tag.clear();
            }
            (true, '>') => {
                in_tag = false;

                let name = tag
                    .trim_start_matches('/')
                    .split(|c: char| c.is_whitespace() || c == '/')
                    .next()
                    .unwrap_or("")
                    .to_ascii_lowercase();

                if BLOCK_TAGS.contains(&name.as_str()) {
                    text.push('\n');
                }
            }
            (true, c) => tag.push(c),
            (false, c) => text.push(c),
        }
    }

    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&");

    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_strips_markup() {
        let markup = "<h1>About   Me</h1>\n<p>Rust &amp; <b>graphics</b></p><ul><li>One</li><li>Two</li></ul>";

        assert_eq!(plain_text(markup), "About Me\nRust & graphics\nOne\nTwo");
    }

    #[test]
    fn password_inputs_are_masked() {
        let mut input = Element::new(ElementId(0), ElementKind::Input);
        input.set_placeholder("Password").set_password(true);
        assert_eq!(input.display_text(), "Password");

        input.set_value("hunter");
        assert_eq!(input.display_text(), "••••••");
    }

    #[test]
    fn offset_size_prefers_explicit_size() {
        let mut div = Element::new(ElementId(3), ElementKind::Div);
        div.style_mut().padding = 5.;
        div.set_size(200., 100.);

        assert_eq!(div.offset_size(), Size::new(210., 110.));
    }

    #[test]
    fn offset_size_estimates_text() {
        let mut p = Element::new(ElementId(1), ElementKind::Paragraph);
        p.set_html("abcd");

        let size = p.offset_size();
        assert_eq!(size.width, 4. * DEFAULT_FONT_SIZE * CHAR_WIDTH);
        assert_eq!(size.height, DEFAULT_FONT_SIZE * LINE_HEIGHT);

        p.set_width(231.);
        assert_eq!(p.offset_size().width, 231.);
    }

    #[test]
    fn listeners_are_registered_once() {
        let mut img = Element::new(ElementId(2), ElementKind::Image {
            source: "img/about.png".into(),
        });
        img.listen(EventKind::Click).listen(EventKind::Click);

        assert!(img.listens(EventKind::Click));
        assert!(!img.listens(EventKind::KeyUp));
        assert_eq!(img.listeners.len(), 1);
    }
}

//====================================================================
