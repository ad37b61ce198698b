//====================================================================

use std::fmt::Display;

//====================================================================

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

#[allow(dead_code)]
impl<T> Size<T> {
    #[inline]
    pub fn new(width: T, height: T) -> Self {
        Self { width, height }
    }
}

impl<T> From<(T, T)> for Size<T> {
    #[inline]
    fn from(value: (T, T)) -> Self {
        Self {
            width: value.0,
            height: value.1,
        }
    }
}

impl<T> From<Size<T>> for (T, T) {
    #[inline]
    fn from(value: Size<T>) -> Self {
        (value.width, value.height)
    }
}

impl<T: Display> Display for Size<T> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.width, self.height)
    }
}

impl Size<u32> {
    #[inline]
    pub fn to_f32(self) -> Size<f32> {
        Size::new(self.width as f32, self.height as f32)
    }
}

impl Size<f32> {
    #[inline]
    pub fn to_u32(self) -> Size<u32> {
        Size::new(self.width.max(0.) as u32, self.height.max(0.) as u32)
    }
}

//====================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1., 1., 1.);
    pub const BLACK: Color = Color::rgb(0., 0., 0.);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const GREEN: Color = Color::rgb(0., 0.5, 0.);
    pub const BLUE: Color = Color::rgb(0., 0., 1.);
    pub const LIGHT_BLUE: Color = Color::rgb(0.68, 0.85, 0.9);
    pub const TRANSPARENT: Color = Color::rgba(0., 0., 0., 0.);

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1. }
    }

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let channel = |value: f32| (value.clamp(0., 1.) * 255.).round() as u8;
        [
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a),
        ]
    }
}

impl Default for Color {
    #[inline]
    fn default() -> Self {
        Self::WHITE
    }
}

//====================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub position: glam::Vec2,
    pub size: Size<f32>,
}

impl Rect {
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: glam::vec2(x, y),
            size: Size::new(width, height),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.position.x + self.size.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.height
    }

    /// Edges are inclusive on the top-left and exclusive on the bottom-right.
    #[inline]
    pub fn contains(&self, point: glam::Vec2) -> bool {
        point.x >= self.position.x
            && point.y >= self.position.y
            && point.x < self.right()
            && point.y < self.bottom()
    }
}

//====================================================================


//====================================================================
