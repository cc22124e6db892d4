use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Art for the overlay: image atlases and the named cells inside them.
/// Sprites refer to their atlas by name, so atlases can be reordered freely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub atlases: Vec<AtlasDescriptor>,
    #[serde(default)]
    pub sprites: BTreeMap<String, SpriteDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasDescriptor {
    pub name: String,
    /// Image URL, relative to the page.
    pub path: String,
    #[serde(default = "one")]
    pub cols: u32,
    #[serde(default = "one")]
    pub rows: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteDescriptor {
    pub atlas: String,
    #[serde(default)]
    pub col: u32,
    #[serde(default)]
    pub row: u32,
}

fn one() -> u32 {
    1
}

impl AssetManifest {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Position of the atlas called `name`.
    pub fn atlas_index(&self, name: &str) -> Option<usize> {
        self.atlases.iter().position(|a| a.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wing_frames() {
        let json = r#"{
            "atlases": [
                { "name": "bubble", "path": "/bubble.svg" },
                { "name": "dragon", "path": "/dragon.png", "cols": 2 }
            ],
            "sprites": {
                "dragon_wings_up": { "atlas": "dragon" },
                "dragon_wings_down": { "atlas": "dragon", "col": 1 }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.atlases[0].cols, 1);
        assert_eq!(manifest.atlas_index("dragon"), Some(1));
        assert_eq!(manifest.atlas_index("safe"), None);
        assert_eq!(manifest.sprites["dragon_wings_down"].col, 1);
        assert_eq!(manifest.sprites["dragon_wings_up"].row, 0);
    }

    #[test]
    fn empty_object_is_valid() {
        assert_eq!(AssetManifest::from_json("{}").unwrap(), AssetManifest::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(AssetManifest::from_json("{ \"atlases\": 3 }").is_err());
    }
}
