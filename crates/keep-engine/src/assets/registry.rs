use std::collections::BTreeMap;

use crate::assets::manifest::AssetManifest;
use crate::components::sprite::{AtlasId, SpriteComponent};

/// Sprites by name, resolved against a manifest's atlas list.
#[derive(Debug, Default)]
pub struct SpriteRegistry {
    sprites: BTreeMap<String, SpriteComponent>,
}

impl SpriteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sprites naming an atlas the manifest doesn't list are skipped with a warning.
    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let mut registry = Self::new();
        for (name, desc) in &manifest.sprites {
            let Some(index) = manifest.atlas_index(&desc.atlas) else {
                log::warn!("sprite '{}' names unknown atlas '{}'", name, desc.atlas);
                continue;
            };
            registry.insert(
                name.clone(),
                SpriteComponent::cell(desc.col as f32, desc.row as f32)
                    .in_atlas(AtlasId(index as u32)),
            );
        }
        registry
    }

    pub fn insert(&mut self, name: impl Into<String>, sprite: SpriteComponent) {
        self.sprites.insert(name.into(), sprite);
    }

    pub fn get(&self, name: &str) -> Option<&SpriteComponent> {
        self.sprites.get(name)
    }

    /// Named sprite, or `fallback` if the manifest lacks it.
    pub fn get_or(&self, name: &str, fallback: SpriteComponent) -> SpriteComponent {
        self.get(name).cloned().unwrap_or(fallback)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}
