//====================================================================

use std::{
    path::PathBuf,
    sync::{atomic::AtomicU32, Arc},
};

use rustc_hash::FxHashMap;

use super::{shared::SharedRenderResources, texture::Texture};

//====================================================================

static CURRENT_TEXTURE_ID: AtomicU32 = AtomicU32::new(0);

pub struct LoadedTexture {
    id: u32,
    _texture: Texture,
    bind_group: wgpu::BindGroup,
}

impl LoadedTexture {
    pub fn load_texture(
        device: &wgpu::Device,
        shared: &SharedRenderResources,
        texture: Texture,
    ) -> Self {
        let id = CURRENT_TEXTURE_ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let bind_group = shared.create_bind_group(device, &texture, None);
        Self {
            id,
            _texture: texture,
            bind_group,
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

impl PartialEq for LoadedTexture {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

//====================================================================

/// Image textures keyed by their source path. Each source is read from disk
/// at most once; failures are remembered as the fallback texture.
pub struct TextureStorage {
    root: PathBuf,
    fallback: Arc<LoadedTexture>,
    loaded: FxHashMap<String, Arc<LoadedTexture>>,
}

impl TextureStorage {
    pub fn new(root: PathBuf, fallback: Arc<LoadedTexture>) -> Self {
        Self {
            root,
            fallback,
            loaded: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn fallback(&self) -> &Arc<LoadedTexture> {
        &self.fallback
    }

    pub fn get_or_load(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        shared: &SharedRenderResources,
        source: &str,
    ) -> Arc<LoadedTexture> {
        if let Some(texture) = self.loaded.get(source) {
            return texture.clone();
        }

        let path = self.root.join(source);
        let texture = match image::open(&path) {
            Ok(image) => {
                log::debug!("Loaded image '{}'", source);
                Arc::new(LoadedTexture::load_texture(
                    device,
                    shared,
                    Texture::from_image(device, queue, &image, Some(source), None),
                ))
            }
            Err(e) => {
                log::warn!("Unable to load image {:?}: {}", path, e);
                self.fallback.clone()
            }
        };

        self.loaded.insert(source.to_string(), texture.clone());
        texture
    }
}

//====================================================================
