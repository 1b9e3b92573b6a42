use crate::engine::renderer::Renderer;
use crate::orrery::{TextureHandle, TextureLoader};
use std::cell::Cell;
use std::rc::Rc;
use web_sys::WebGlTexture;

struct BankedTexture {
    texture: WebGlTexture,
    failed: Rc<Cell<bool>>,
}

/// GPU textures owned on behalf of the bodies, addressed by `TextureHandle`.
#[derive(Default)]
pub struct TextureBank {
    textures: Vec<BankedTexture>,
}

impl TextureBank {
    pub fn get(&self, handle: TextureHandle) -> Option<&WebGlTexture> {
        self.textures.get(handle.0).map(|banked| &banked.texture)
    }

    /// True once the image behind `handle` has failed to load, or if the handle is unknown.
    pub fn failed(&self, handle: TextureHandle) -> bool {
        self.textures.get(handle.0).map_or(true, |banked| banked.failed.get())
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }
}

/// Feeds textures named in the body description into a `TextureBank`.
pub struct TextureUploader<'a> {
    pub renderer: &'a Renderer,
    pub bank: &'a mut TextureBank,
}

impl TextureLoader for TextureUploader<'_> {
    fn register(&mut self, source: &str) -> Option<TextureHandle> {
        let failed = Rc::new(Cell::new(false));
        match self.renderer.create_texture(source, failed.clone()) {
            Ok(texture) => {
                self.bank.textures.push(BankedTexture { texture, failed });
                Some(TextureHandle(self.bank.textures.len() - 1))
            }
            Err(err) => {
                web_sys::console::warn_2(&format!("Texture {source} failed:").into(), &err);
                None
            }
        }
    }
}
