use std::collections::HashMap;

use crate::crs::EpsgCode;

pub type Attributes = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: geo::Geometry,
    // TODO support different value types besides String. See gdal::vector::OGRFieldType for types
    // supported by GDAL.
    pub attributes: Option<Attributes>,
    /// Spatial reference of the geometry, if known.
    pub srid: Option<EpsgCode>,
}

impl Feature {
    pub fn with_attributes(geometry: geo::Geometry, attributes: Attributes) -> Self {
        Self {
            geometry,
            attributes: Some(attributes),
            srid: None,
        }
    }

    /// Attribute names in a stable order, empty when the feature has no attributes.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = match &self.attributes {
            Some(attributes) => attributes.keys().map(|key| key as &str).collect(),
            None => Vec::new(),
        };
        names.sort_unstable();
        names
    }
}

impl From<geo::Geometry> for Feature {
    fn from(value: geo::Geometry) -> Self {
        Self {
            geometry: value,
            attributes: None,
            srid: None,
        }
    }
}
