use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::sprite::SpriteComponent;

/// Something on the page overlay. Positions and sizes are CSS px relative to
/// the viewport, matching how the host lays out the element.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    /// Lookup name, e.g. `"dragon"`.
    pub tag: String,
    /// Hidden entities keep their state and tweens but are not drawn.
    pub visible: bool,
    /// Top-left corner.
    pub pos: Vec2,
    pub size: Vec2,
    /// Nothing is drawn without a sprite.
    pub sprite: Option<SpriteComponent>,
}

impl Entity {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            visible: true,
            pos: Vec2::ZERO,
            size: Vec2::ONE,
            sprite: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteComponent) -> Self {
        self.sprite = Some(sprite);
        self
    }
}
