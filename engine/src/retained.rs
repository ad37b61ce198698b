//====================================================================

use common::{Color, Rect, Size};
use web_time::Instant;

use crate::{
    content::ContentRequest,
    surface::{Element, ElementId, ElementKind, Surface},
};

//====================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: Some(Color::WHITE),
            stroke: Some(Color::BLACK),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CanvasOp {
    Rect { rect: Rect, style: ShapeStyle },
}

//====================================================================

/// In-memory surface. Canvas operations only live for the current frame,
/// elements live until `remove_elements`.
pub struct RetainedSurface {
    size: Size<f32>,
    now: Instant,

    clear_color: Option<Color>,
    canvas: Vec<CanvasOp>,
    shape_style: ShapeStyle,
    style_stack: Vec<ShapeStyle>,

    elements: Vec<Element>,
    next_id: u32,
    focus: Option<ElementId>,

    generation: u64,
    content_requests: Vec<ContentRequest>,
}

impl RetainedSurface {
    pub fn new(size: Size<f32>) -> Self {
        Self {
            size,
            now: Instant::now(),
            clear_color: None,
            canvas: Vec::new(),
            shape_style: ShapeStyle::default(),
            style_stack: Vec::new(),
            elements: Vec::new(),
            next_id: 0,
            focus: None,
            generation: 0,
            content_requests: Vec::new(),
        }
    }

    #[inline]
    pub fn resize(&mut self, size: Size<f32>) {
        self.size = size;
    }

    pub fn begin_frame(&mut self, now: Instant) {
        self.now = now;
        self.canvas.clear();
        self.style_stack.clear();
        self.shape_style = ShapeStyle::default();
    }

    #[inline]
    pub fn clear_color(&self) -> Option<Color> {
        self.clear_color
    }

    #[inline]
    pub fn canvas(&self) -> &[CanvasOp] {
        &self.canvas
    }

    /// Elements in creation order.
    #[inline]
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Elements back to front: by z-index, then creation order.
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut ordered = self.elements.iter().collect::<Vec<_>>();
        ordered.sort_by_key(|element| (element.style().z_index, element.id()));
        ordered
    }

    /// The topmost element under `point`, if any.
    pub fn hit_test(&self, point: glam::Vec2) -> Option<ElementId> {
        self.paint_order()
            .into_iter()
            .rev()
            .find(|element| element.bounds().contains(point))
            .map(|element| element.id())
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    #[inline]
    pub fn take_content_requests(&mut self) -> Vec<ContentRequest> {
        std::mem::take(&mut self.content_requests)
    }
}

//--------------------------------------------------

impl RetainedSurface {
    #[inline]
    pub fn focused(&self) -> Option<ElementId> {
        self.focus
    }

    /// Focus an input element. Anything else clears the focus.
    pub fn focus(&mut self, id: Option<ElementId>) {
        self.focus = id.filter(|id| {
            self.element(*id)
                .map(|element| element.kind() == &ElementKind::Input)
                .unwrap_or(false)
        });
    }

    /// Append text to the focused input, returning the edited element.
    pub fn type_text(&mut self, text: &str) -> Option<ElementId> {
        let id = self.focus?;
        let element = self.element_mut(id)?;

        let value = format!("{}{}", element.value(), text);
        element.set_value(value);
        Some(id)
    }

    pub fn backspace(&mut self) -> Option<ElementId> {
        let id = self.focus?;
        let element = self.element_mut(id)?;

        let mut value = element.value().to_string();
        value.pop();
        element.set_value(value);
        Some(id)
    }

    fn create(&mut self, kind: ElementKind) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;

        self.elements.push(Element::new(id, kind));
        id
    }
}

//--------------------------------------------------

impl Surface for RetainedSurface {
    #[inline]
    fn size(&self) -> Size<f32> {
        self.size
    }

    #[inline]
    fn now(&self) -> Instant {
        self.now
    }

    fn background(&mut self, color: Color) {
        self.clear_color = Some(color);
        self.canvas.clear();
    }

    #[inline]
    fn push(&mut self) {
        self.style_stack.push(self.shape_style);
    }

    fn pop(&mut self) {
        match self.style_stack.pop() {
            Some(style) => self.shape_style = style,
            None => log::warn!("Unbalanced pop on surface style stack"),
        }
    }

    #[inline]
    fn fill(&mut self, color: Color) {
        self.shape_style.fill = Some(color);
    }

    #[inline]
    fn stroke(&mut self, color: Option<Color>) {
        self.shape_style.stroke = color;
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.canvas.push(CanvasOp::Rect {
            rect: Rect::new(x, y, width, height),
            style: self.shape_style,
        });
    }

    fn remove_elements(&mut self) {
        log::trace!("Removing {} elements", self.elements.len());
        self.elements.clear();
        self.focus = None;
    }

    #[inline]
    fn create_img(&mut self, source: &str) -> ElementId {
        self.create(ElementKind::Image {
            source: source.to_string(),
        })
    }

    fn create_p(&mut self, text: &str) -> ElementId {
        let id = self.create(ElementKind::Paragraph);
        if let Some(element) = self.element_mut(id) {
            element.set_html(text);
        }
        id
    }

    fn create_input(&mut self, value: &str) -> ElementId {
        let id = self.create(ElementKind::Input);
        if let Some(element) = self.element_mut(id) {
            element.set_value(value);
        }
        id
    }

    #[inline]
    fn create_div(&mut self) -> ElementId {
        self.create(ElementKind::Div)
    }

    fn element(&self, id: ElementId) -> Option<&Element> {
        // Ids are handed out in increasing order and never reused
        self.elements
            .binary_search_by_key(&id, |element| element.id())
            .ok()
            .map(|index| &self.elements[index])
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements
            .binary_search_by_key(&id, |element| element.id())
            .ok()
            .map(|index| &mut self.elements[index])
    }

    fn fetch(&mut self, source: &str, sequence: u64) {
        log::debug!("Queueing content request {} for '{}'", sequence, source);

        self.content_requests.push(ContentRequest {
            generation: self.generation,
            sequence,
            source: source.to_string(),
        });
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::EventKind;

    fn surface() -> RetainedSurface {
        RetainedSurface::new(Size::new(640., 480.))
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut surface = surface();
        let first = surface.create_div();
        surface.remove_elements();
        let second = surface.create_div();

        assert_ne!(first, second);
        assert!(surface.element(first).is_none());
        assert!(surface.element(second).is_some());
    }

    #[test]
    fn canvas_is_frame_scoped_and_styles_restore() {
        let mut surface = surface();

        surface.push();
        surface.fill(Color::BLUE);
        surface.rect(0., 0., 10., 10.);
        surface.pop();
        surface.rect(5., 5., 10., 10.);

        let fills = surface
            .canvas()
            .iter()
            .map(|CanvasOp::Rect { style, .. }| style.fill)
            .collect::<Vec<_>>();
        assert_eq!(fills, vec![Some(Color::BLUE), Some(Color::WHITE)]);

        surface.begin_frame(Instant::now());
        assert!(surface.canvas().is_empty());
    }

    #[test]
    fn hit_test_prefers_higher_z_index() {
        let mut surface = surface();

        let low = surface.create_div();
        surface.get(low).unwrap().set_position(0., 0.).set_size(100., 100.);

        let high = surface.create_div();
        {
            let element = surface.get(high).unwrap();
            element.set_position(50., 50.).set_size(30., 30.);
            element.style_mut().z_index = 999;
        }

        // Created later, but below the z-indexed element
        let later = surface.create_img("img/about.png");
        surface
            .get(later)
            .unwrap()
            .set_position(40., 40.)
            .set_size(60., 60.)
            .listen(EventKind::Click);

        assert_eq!(surface.hit_test(glam::vec2(60., 60.)), Some(high));
        assert_eq!(surface.hit_test(glam::vec2(45., 45.)), Some(later));
        assert_eq!(surface.hit_test(glam::vec2(10., 10.)), Some(low));
        assert_eq!(surface.hit_test(glam::vec2(300., 300.)), None);
    }

    #[test]
    fn typing_edits_focused_input_only() {
        let mut surface = surface();
        let input = surface.create_input("");
        let label = surface.create_p("Guest");

        surface.focus(Some(label));
        assert_eq!(surface.type_text("a"), None);

        surface.focus(Some(input));
        surface.type_text("ab");
        surface.type_text("c");
        assert_eq!(surface.backspace(), Some(input));
        assert_eq!(surface.element(input).map(|e| e.value()), Some("ab"));

        surface.remove_elements();
        assert_eq!(surface.focused(), None);
    }

    #[test]
    fn fetch_is_tagged_with_generation() {
        let mut surface = surface();
        surface.set_generation(7);
        surface.fetch("htmlLayouts/about.html", 2);

        let requests = surface.take_content_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].generation, 7);
        assert_eq!(requests[0].sequence, 2);
        assert!(surface.take_content_requests().is_empty());
    }
}

//====================================================================
