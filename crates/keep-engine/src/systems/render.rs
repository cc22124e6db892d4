use crate::components::entity::Entity;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Refill `buffer` from `entities`, in iteration order. Hidden entities and
/// entities without a sprite produce nothing.
pub fn build_render_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();

    for entity in entities.filter(|e| e.visible) {
        let Some(sprite) = &entity.sprite else {
            continue;
        };
        let drawn = buffer.push(RenderInstance {
            x: entity.pos.x,
            y: entity.pos.y,
            width: entity.size.x,
            height: entity.size.y,
            atlas: sprite.atlas.0 as f32,
            col: sprite.col,
            row: sprite.row,
            alpha: sprite.alpha,
        });
        if !drawn {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::components::sprite::{AtlasId, SpriteComponent};
    use glam::Vec2;

    #[test]
    fn writes_the_css_box() {
        let entities = vec![
            Entity::new(EntityId(1))
                .with_pos(Vec2::new(10.0, 20.0))
                .with_size(Vec2::new(300.0, 240.0))
                .with_sprite(SpriteComponent::cell(1.0, 0.0).in_atlas(AtlasId(2))),
            Entity::new(EntityId(2)).with_pos(Vec2::new(30.0, 40.0)),
        ];

        let mut buffer = RenderBuffer::default();
        build_render_buffer(entities.iter(), &mut buffer);

        assert_eq!(buffer.instance_count(), 1);
        let inst = buffer.instances[0];
        assert_eq!((inst.x, inst.y, inst.width, inst.height), (10.0, 20.0, 300.0, 240.0));
        assert_eq!((inst.atlas, inst.col, inst.alpha), (2.0, 1.0, 1.0));
    }

    #[test]
    fn hidden_entities_are_skipped() {
        let mut entity = Entity::new(EntityId(1)).with_sprite(SpriteComponent::default());
        entity.visible = false;

        let mut buffer = RenderBuffer::default();
        build_render_buffer(std::iter::once(&entity), &mut buffer);
        assert_eq!(buffer.instance_count(), 0);
    }
}
