use bevy::prelude::*;
use rand::Rng;

use crate::engine::assets::point_chunk::PointChunk;
use crate::engine::assets::point_registry::Point;

/// Scale and jitter applied to every chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormaliseSettings {
    pub scale: f32,
    pub jitter_amplitude: f32,
}

impl Default for NormaliseSettings {
    fn default() -> Self {
        Self {
            scale: constants::loading::CHUNK_SCALE,
            jitter_amplitude: constants::loading::JITTER_AMPLITUDE,
        }
    }
}

/// Centre a chunk on its own centroid and scale it, without jitter.
/// Returns `None` for an empty chunk, whose centroid is undefined.
pub fn centre_and_scale(chunk: &PointChunk, scale: f32) -> Option<Vec<Vec3>> {
    let centroid = chunk.centroid()?;
    Some(
        chunk
            .records
            .iter()
            .map(|record| (record.position() - centroid) * scale)
            .collect(),
    )
}

/// Uniform offset in `[-amplitude, amplitude)` for each axis.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, amplitude: f32) -> Vec3 {
    let mut axis = || (rng.r#gen::<f32>() - 0.5) * 2.0 * amplitude;
    Vec3::new(axis(), axis(), axis())
}

/// Turn a raw chunk into registry points.
///
/// Each chunk is centred independently, so separate chunks cluster around
/// their own local origin after scaling.
pub fn normalise_chunk<R: Rng + ?Sized>(
    chunk: &PointChunk,
    settings: NormaliseSettings,
    rng: &mut R,
) -> Option<Vec<Point>> {
    let positions = centre_and_scale(chunk, settings.scale)?;

    Some(
        chunk
            .records
            .iter()
            .zip(positions)
            .map(|(record, position)| {
                Point::new(
                    position + jitter(rng, settings.jitter_amplitude),
                    record.image.clone(),
                    record.title.clone(),
                )
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::point_chunk::RawPointRecord;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn chunk(coords: &[(f32, f32, f32)]) -> PointChunk {
        PointChunk {
            records: coords
                .iter()
                .enumerate()
                .map(|(i, &(x, y, z))| RawPointRecord {
                    x,
                    y,
                    z,
                    image: format!("img{i}"),
                    title: format!("title{i}"),
                })
                .collect(),
        }
    }

    #[test]
    fn centred_positions_have_zero_mean() {
        let raw = chunk(&[(1.5, -2.0, 10.0), (3.25, 4.0, 11.0), (-0.75, 0.5, 9.5)]);
        let positions = centre_and_scale(&raw, 35.0).expect("non-empty chunk");

        let mean: Vec3 = positions.iter().copied().sum::<Vec3>() / positions.len() as f32;
        assert!(mean.abs_diff_eq(Vec3::ZERO, 1e-4), "mean was {mean}");
    }

    #[test]
    fn scales_offsets_from_centroid() {
        let raw = chunk(&[(0.0, 0.0, 0.0), (2.0, 0.0, 0.0)]);
        let positions = centre_and_scale(&raw, 35.0).expect("non-empty chunk");
        assert_eq!(positions, vec![Vec3::new(-35.0, 0.0, 0.0), Vec3::new(35.0, 0.0, 0.0)]);
    }

    #[test]
    fn jitter_stays_within_amplitude() {
        let raw = chunk(&[(1.0, 1.0, 1.0), (5.0, -3.0, 2.0), (0.0, 0.0, 0.0)]);
        let expected = centre_and_scale(&raw, 35.0).expect("non-empty chunk");
        let mut rng = StdRng::seed_from_u64(7);

        let points = normalise_chunk(&raw, NormaliseSettings::default(), &mut rng)
            .expect("non-empty chunk");

        assert_eq!(points.len(), 3);
        for (point, base) in points.iter().zip(expected) {
            let offset = point.position() - base;
            assert!(offset.abs().max_element() <= 1.0, "offset {offset} too large");
        }
        assert_eq!(points[1].image(), "img1");
        assert_eq!(points[2].title(), "title2");
    }

    #[test]
    fn zero_amplitude_disables_jitter() {
        let raw = chunk(&[(1.0, 2.0, 3.0), (3.0, 2.0, 1.0)]);
        let settings = NormaliseSettings {
            scale: 2.0,
            jitter_amplitude: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(1);

        let points = normalise_chunk(&raw, settings, &mut rng).expect("non-empty chunk");
        assert_eq!(points[0].position(), Vec3::new(-2.0, 0.0, 2.0));
        assert_eq!(points[1].position(), Vec3::new(2.0, 0.0, -2.0));
    }

    #[test]
    fn empty_chunk_is_not_normalised() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(normalise_chunk(&PointChunk::default(), NormaliseSettings::default(), &mut rng).is_none());
    }
}
