use crate::crs::EpsgCode;
use crate::geofile::feature::{Attributes, Feature};

/// Keeps line strings only. Points surfaced for tagged standalone nodes and polygons are dropped.
pub fn filter_line_strings<I>(features: I) -> impl Iterator<Item = anyhow::Result<Feature>>
where
    I: Iterator<Item = anyhow::Result<Feature>>,
{
    features.filter(|feature| match feature {
        Ok(feature) => matches!(feature.geometry, geo::Geometry::LineString(_)),
        Err(_) => true,
    })
}

/// Gives every feature the same attribute table and SRID, so that the output has one record
/// layout.
pub struct AttributeNormalizer {
    attributes: Attributes,
    srid: EpsgCode,
}

impl AttributeNormalizer {
    pub fn new(attributes: Attributes, srid: EpsgCode) -> Self {
        Self { attributes, srid }
    }

    pub fn normalize(&self, feature: Feature) -> Feature {
        Feature {
            geometry: feature.geometry,
            attributes: Some(self.attributes.clone()),
            srid: Some(self.srid),
        }
    }

    /// Normalizes every feature into the collection handed to the writer. Stops at the first error.
    pub fn collect<I>(&self, features: I) -> anyhow::Result<Vec<Feature>>
    where
        I: Iterator<Item = anyhow::Result<Feature>>,
    {
        features
            .map(|feature| feature.map(|feature| self.normalize(feature)))
            .collect()
    }
}
