/// Index into the manifest's atlas list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AtlasId(pub u32);

/// Which atlas cell an entity shows, and how opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteComponent {
    pub atlas: AtlasId,
    pub col: f32,
    pub row: f32,
    /// 0 transparent, 1 opaque.
    pub alpha: f32,
}

impl SpriteComponent {
    /// Opaque cell of atlas 0.
    pub fn cell(col: f32, row: f32) -> Self {
        Self {
            atlas: AtlasId(0),
            col,
            row,
            alpha: 1.0,
        }
    }

    pub fn in_atlas(mut self, atlas: AtlasId) -> Self {
        self.atlas = atlas;
        self
    }
}

impl Default for SpriteComponent {
    fn default() -> Self {
        Self::cell(0.0, 0.0)
    }
}
