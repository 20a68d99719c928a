use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Single record as served by the chunk source, before normalisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPointRecord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Base64 encoded image bytes. Served as `img`, `image` is accepted too.
    #[serde(rename = "img", alias = "image")]
    pub image: String,
    #[serde(default)]
    pub title: String,
}

impl RawPointRecord {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// One `chunk_<index>.json` file as a Bevy asset.
/// The file is a bare JSON array, hence the transparent wrapper.
#[derive(Asset, TypePath, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointChunk {
    pub records: Vec<RawPointRecord>,
}

impl PointChunk {
    /// Mean position over this chunk only. `None` for an empty chunk.
    pub fn centroid(&self) -> Option<Vec3> {
        if self.records.is_empty() {
            return None;
        }

        let sum: Vec3 = self.records.iter().map(RawPointRecord::position).sum();
        Some(sum / self.records.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array_with_img_field() {
        let json = r#"[
            {"x": 1.0, "y": 2.0, "z": 3.0, "img": "AAAA", "title": "first"},
            {"x": -1.0, "y": 0.5, "z": 0.0, "image": "BBBB"}
        ]"#;

        let chunk: PointChunk = serde_json::from_str(json).expect("chunk parses");
        assert_eq!(chunk.records.len(), 2);
        assert_eq!(chunk.records[0].image, "AAAA");
        assert_eq!(chunk.records[0].title, "first");
        assert_eq!(chunk.records[1].image, "BBBB");
        assert!(chunk.records[1].title.is_empty());
    }

    #[test]
    fn rejects_object_payload() {
        let json = r#"{"points": []}"#;
        assert!(serde_json::from_str::<PointChunk>(json).is_err());
    }

    #[test]
    fn centroid_is_per_chunk_mean() {
        let chunk: PointChunk = serde_json::from_str(
            r#"[
                {"x": 0.0, "y": 0.0, "z": 0.0, "img": ""},
                {"x": 2.0, "y": 4.0, "z": -6.0, "img": ""}
            ]"#,
        )
        .expect("chunk parses");

        assert_eq!(chunk.centroid(), Some(Vec3::new(1.0, 2.0, -3.0)));
        assert_eq!(PointChunk::default().centroid(), None);
    }
}
