//====================================================================

use std::{hash::BuildHasherDefault, num::NonZeroUsize, sync::Arc};

use common::{Color, Size};
use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, Wrap};
use lru::LruCache;
use rustc_hash::FxHasher;

use crate::{shared::SharedRenderResources, texture::Texture, texture_storage::LoadedTexture};

//====================================================================

type FastHasher = BuildHasherDefault<FxHasher>;

const DEFAULT_CACHE_SIZE: usize = 256;
const LINE_HEIGHT: f32 = 1.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub color: Color,
    pub monospace: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.,
            color: Color::BLACK,
            monospace: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct TextKey {
    text: String,
    font_size: u32,
    size: (u32, u32),
    color: [u8; 4],
    monospace: bool,
}

impl TextKey {
    fn new(text: &str, style: &TextStyle, size: Size<u32>) -> Self {
        Self {
            text: text.to_string(),
            font_size: style.font_size.to_bits(),
            size: size.into(),
            color: style.color.to_rgba8(),
            monospace: style.monospace,
        }
    }
}

//====================================================================

/// Rasterizes text blocks into textures. Unchanged blocks are served from
/// an LRU cache, so a static label is shaped once.
pub struct TextResources {
    font_system: FontSystem,
    swash_cache: SwashCache,
    cached: LruCache<TextKey, Arc<LoadedTexture>, FastHasher>,
}

impl TextResources {
    pub fn new() -> Self {
        let capacity = NonZeroUsize::new(DEFAULT_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);

        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            cached: LruCache::with_hasher(capacity, FastHasher::default()),
        }
    }

    #[inline]
    pub fn cached(&self) -> usize {
        self.cached.len()
    }

    pub fn get_or_rasterize(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        shared: &SharedRenderResources,
        text: &str,
        style: &TextStyle,
        bounds: Size<f32>,
    ) -> Arc<LoadedTexture> {
        let size = Size::new(
            bounds.width.ceil().max(1.) as u32,
            bounds.height.ceil().max(1.) as u32,
        );
        let key = TextKey::new(text, style, size);

        if let Some(texture) = self.cached.get(&key) {
            return texture.clone();
        }

        let image = self.rasterize(text, style, size);
        let texture = Arc::new(LoadedTexture::load_texture(
            device,
            shared,
            Texture::from_image(
                device,
                queue,
                &image::DynamicImage::ImageRgba8(image),
                Some("Text Texture"),
                None,
            ),
        ));

        log::trace!("Rasterized text block {:?} at {}", text, size);

        self.cached.put(key, texture.clone());
        texture
    }

    fn rasterize(&mut self, text: &str, style: &TextStyle, size: Size<u32>) -> image::RgbaImage {
        let mut image = image::RgbaImage::new(size.width, size.height);

        let metrics = Metrics::new(style.font_size, style.font_size * LINE_HEIGHT);
        let family = match style.monospace {
            true => Family::Monospace,
            false => Family::SansSerif,
        };

        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(
            &mut self.font_system,
            Some(size.width as f32),
            Some(size.height as f32),
        );
        buffer.set_wrap(&mut self.font_system, Wrap::WordOrGlyph);
        buffer.set_text(
            &mut self.font_system,
            text,
            Attrs::new().family(family),
            Shaping::Advanced,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);

        let [r, g, b, a] = style.color.to_rgba8();
        let color = cosmic_text::Color::rgba(r, g, b, a);

        buffer.draw(
            &mut self.font_system,
            &mut self.swash_cache,
            color,
            |x, y, width, height, color| {
                if color.a() == 0 {
                    return;
                }

                (0..height as i32).for_each(|dy| {
                    (0..width as i32).for_each(|dx| {
                        let (px, py) = (x + dx, y + dy);
                        if px < 0 || py < 0 || px >= size.width as i32 || py >= size.height as i32
                        {
                            return;
                        }

                        let pixel = image.get_pixel_mut(px as u32, py as u32);
                        let alpha = pixel.0[3].max(color.a());
                        pixel.0 = [color.r(), color.g(), color.b(), alpha];
                    })
                });
            },
        );

        image
    }
}

impl Default for TextResources {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_separate_style_changes() {
        let size = Size::new(100, 20);
        let style = TextStyle::default();
        let key = TextKey::new("Guest", &style, size);

        assert_eq!(key, TextKey::new("Guest", &style, size));

        let green = TextStyle {
            color: Color::GREEN,
            ..style
        };
        assert_ne!(key, TextKey::new("Guest", &green, size));
        assert_ne!(key, TextKey::new("Guest", &style, Size::new(100, 21)));
        assert_ne!(key, TextKey::new("Guests", &style, size));
    }
}

//====================================================================
