//====================================================================

use common::{Color, Rect, Size};
use renderer::{Renderer, TextStyle};

use crate::{
    retained::{CanvasOp, RetainedSurface},
    surface::{Element, ElementKind, FontFamily},
};

//====================================================================

const STROKE_WIDTH: f32 = 1.;

/// Hand one frame of a surface to the renderer: clear color, canvas shapes
/// and finally the elements back to front.
pub fn present(renderer: &mut Renderer, surface: &RetainedSurface) {
    renderer.set_clear_color(surface.clear_color().unwrap_or(Color::WHITE));

    surface.canvas().iter().for_each(|op| match op {
        CanvasOp::Rect { rect, style } => {
            if let Some(fill) = style.fill {
                renderer.draw_rect(*rect, fill);
            }
            if let Some(stroke) = style.stroke {
                outline(*rect, STROKE_WIDTH)
                    .into_iter()
                    .for_each(|edge| renderer.draw_rect(edge, stroke));
            }
        }
    });

    surface
        .paint_order()
        .into_iter()
        .for_each(|element| present_element(renderer, element));
}

fn present_element(renderer: &mut Renderer, element: &Element) {
    let bounds = element.bounds();
    let style = element.style();

    let background = match element.kind() {
        ElementKind::Input => Some(style.background.unwrap_or(Color::WHITE)),
        _ => style.background,
    };

    if let Some(background) = background {
        renderer.draw_rect(bounds, background);
    }

    if let ElementKind::Input = element.kind() {
        outline(bounds, STROKE_WIDTH)
            .into_iter()
            .for_each(|edge| renderer.draw_rect(edge, Color::GRAY));
    }

    if let ElementKind::Image { source } = element.kind() {
        renderer.draw_image(source, bounds, Color::WHITE);
        return;
    }

    let text = element.display_text();
    if text.is_empty() {
        return;
    }

    let color = match element.kind() {
        ElementKind::Input if element.value().is_empty() => Color::GRAY,
        _ => style.color,
    };

    let text_style = TextStyle {
        font_size: style.font_size,
        color,
        monospace: style.font_family == FontFamily::Monospace,
    };

    renderer.draw_text(&text, &text_style, text_area(bounds, style.padding, style.font_size));
}

/// Content box of an element. Text gets some slack to the right since the
/// element size is only an estimate of the shaped width.
fn text_area(bounds: Rect, padding: f32, font_size: f32) -> Rect {
    Rect {
        position: bounds.position + glam::Vec2::splat(padding),
        size: Size::new(
            (bounds.size.width - padding * 2.).max(0.) + font_size,
            (bounds.size.height - padding * 2.).max(0.),
        ),
    }
}

fn outline(rect: Rect, width: f32) -> [Rect; 4] {
    let (x, y) = (rect.position.x, rect.position.y);
    let (w, h) = (rect.size.width, rect.size.height);

    [
        Rect::new(x, y, w, width),
        Rect::new(x, y + h - width, w, width),
        Rect::new(x, y, width, h),
        Rect::new(x + w - width, y, width, h),
    ]
}

//====================================================================


//====================================================================
