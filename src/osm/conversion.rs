use anyhow::anyhow;
use std::collections::HashMap;

use super::entity::{OsmEntity, OsmId, OsmNode, OsmWay};
use crate::geofile::feature::Feature;

/// Converts a stream of OSM entities into features.
///
/// Every node coordinate is kept in memory so that ways can be resolved, whether or not the node
/// is ever referenced. Filter the entity stream down to what is needed before converting it,
/// otherwise memory grows with every node in the extract.
///
/// Tagged nodes are yielded as points, ways as line strings, closed ways tagged `area=yes` as
/// polygons. Ways referencing nodes that have not been seen yet are skipped.
pub struct FeatureStream<I> {
    entities: I,
    node_coords: HashMap<OsmId, geo::Coord>,
    skipped_ways: usize,
    exhausted: bool,
}

impl<I> FeatureStream<I>
where
    I: Iterator<Item = anyhow::Result<OsmEntity>>,
{
    pub fn new(entities: I) -> Self {
        Self {
            entities,
            node_coords: HashMap::new(),
            skipped_ways: 0,
            exhausted: false,
        }
    }

    /// Number of ways dropped so far because they could not be resolved.
    pub fn skipped_ways(&self) -> usize {
        self.skipped_ways
    }

    /// Number of node coordinates currently held.
    pub fn cached_nodes(&self) -> usize {
        self.node_coords.len()
    }

    fn convert(&mut self, entity: OsmEntity) -> Option<Feature> {
        match entity {
            OsmEntity::Node(node) => self.convert_node(node),
            OsmEntity::Way(way) => match osm_way_to_geometry(&self.node_coords, &way) {
                Ok(geometry) => Some(Feature {
                    geometry,
                    attributes: way.tags,
                    srid: None,
                }),
                Err(err) => {
                    log::debug!("Skipping way {}: {}", way.id, err);
                    self.skipped_ways += 1;
                    None
                }
            },
            OsmEntity::Relation(_) => None,
        }
    }

    fn convert_node(&mut self, node: OsmNode) -> Option<Feature> {
        let coord = geo::Coord {
            x: node.lon,
            y: node.lat,
        };
        self.node_coords.insert(node.id, coord);
        node.tags
            .map(|tags| Feature::with_attributes(geo::Geometry::Point(geo::Point::from(coord)), tags))
    }
}

impl<I> Iterator for FeatureStream<I>
where
    I: Iterator<Item = anyhow::Result<OsmEntity>>,
{
    type Item = anyhow::Result<Feature>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        loop {
            match self.entities.next() {
                Some(Ok(entity)) => {
                    if let Some(feature) = self.convert(entity) {
                        return Some(Ok(feature));
                    }
                }
                Some(Err(err)) => return Some(Err(err)),
                None => {
                    self.exhausted = true;
                    log::debug!("Held {} node coordinates", self.cached_nodes());
                    if self.skipped_ways() > 0 {
                        log::warn!(
                            "Skipped {} ways referencing nodes missing from the input.",
                            self.skipped_ways()
                        );
                    }
                    return None;
                }
            }
        }
    }
}

pub trait IntoFeatureStream: Iterator<Item = anyhow::Result<OsmEntity>> + Sized {
    fn into_features(self) -> FeatureStream<Self> {
        FeatureStream::new(self)
    }
}

impl<I> IntoFeatureStream for I where I: Iterator<Item = anyhow::Result<OsmEntity>> {}

fn osm_way_to_linestring(
    node_coords: &HashMap<OsmId, geo::Coord>,
    way: &OsmWay,
) -> anyhow::Result<geo::LineString> {
    let mut coords: Vec<geo::Coord> = Vec::with_capacity(way.nodes.len());
    for node_id in &way.nodes {
        match node_coords.get(node_id) {
            Some(coord) => coords.push(*coord),
            None => return Err(anyhow!("Unknown node {}", node_id)),
        }
    }
    if coords.len() < 2 {
        return Err(anyhow!("Expected at least 2 nodes, got {}", coords.len()));
    }
    Ok(geo::LineString::new(coords))
}

fn osm_way_to_geometry(
    node_coords: &HashMap<OsmId, geo::Coord>,
    way: &OsmWay,
) -> anyhow::Result<geo::Geometry> {
    let line = osm_way_to_linestring(node_coords, way)?;
    let is_area = way
        .tags
        .as_ref()
        .and_then(|tags| tags.get("area"))
        .map_or(false, |value| value == "yes");
    if is_area && way.is_closed() {
        return Ok(geo::Geometry::Polygon(geo::Polygon::new(line, vec![])));
    }
    Ok(geo::Geometry::LineString(line))
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use approx::assert_relative_eq;

    use super::{FeatureStream, IntoFeatureStream};
    use crate::geofile::feature::Feature;
    use crate::osm::entity::test_entities::{node, relation, tagged_node, way};
    use crate::osm::entity::OsmEntity;

    fn convert(entities: Vec<OsmEntity>) -> Vec<Feature> {
        entities
            .into_iter()
            .map(Ok)
            .into_features()
            .collect::<anyhow::Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_way_resolved_to_linestring() {
        let features = convert(vec![
            node(1, 6.10, 49.60),
            node(2, 6.11, 49.61),
            node(3, 6.12, 49.63),
            way(10, &[1, 2, 3], &[("power", "line")]),
        ]);

        assert_eq!(features.len(), 1);
        let line = match &features[0].geometry {
            geo::Geometry::LineString(line) => line,
            other => panic!("Expected a line string, got {:?}", other),
        };
        let expected = [(6.10, 49.60), (6.11, 49.61), (6.12, 49.63)];
        assert_eq!(line.0.len(), expected.len());
        for (coord, (x, y)) in line.coords().zip(expected) {
            assert_relative_eq!(coord.x, x);
            assert_relative_eq!(coord.y, y);
        }
        let attributes = features[0].attributes.as_ref().unwrap();
        assert_eq!(attributes.get("power").unwrap(), "line");
    }

    #[test]
    fn test_tagged_node_becomes_point_untagged_node_does_not() {
        let features = convert(vec![
            node(1, 6.10, 49.60),
            tagged_node(2, 6.11, 49.61, &[("power", "tower")]),
        ]);

        assert_eq!(features.len(), 1);
        assert_eq!(
            features[0].geometry,
            geo::Geometry::Point(geo::Point::new(6.11, 49.61))
        );
    }

    #[test]
    fn test_way_with_unseen_node_is_skipped() {
        let entities = vec![
            node(1, 6.10, 49.60),
            way(10, &[1, 2], &[("power", "line")]),
            node(2, 6.11, 49.61),
        ];
        let mut stream = FeatureStream::new(entities.into_iter().map(Ok));
        assert!(stream.next().is_none());
        assert_eq!(stream.skipped_ways(), 1);
        assert_eq!(stream.cached_nodes(), 2);
    }

    #[test]
    fn test_single_node_way_is_skipped() {
        let features = convert(vec![
            node(1, 6.10, 49.60),
            way(10, &[1], &[("power", "line")]),
        ]);
        assert!(features.is_empty());
    }

    #[test]
    fn test_closed_area_way_becomes_polygon() {
        let features = convert(vec![
            node(1, 0.0, 0.0),
            node(2, 1.0, 0.0),
            node(3, 1.0, 1.0),
            way(10, &[1, 2, 3, 1], &[("power", "substation"), ("area", "yes")]),
            way(11, &[1, 2, 3, 1], &[("power", "line")]),
        ]);

        assert_eq!(features.len(), 2);
        assert!(matches!(features[0].geometry, geo::Geometry::Polygon(_)));
        assert!(matches!(features[1].geometry, geo::Geometry::LineString(_)));
    }

    #[test]
    fn test_relations_are_ignored() {
        let features = convert(vec![relation(1, &[("power", "line")])]);
        assert!(features.is_empty());
    }

    #[test]
    fn test_errors_are_passed_through() {
        let entities = vec![Ok(node(1, 6.10, 49.60)), Err(anyhow!("corrupt blob"))];
        let mut stream = entities.into_iter().into_features();
        assert!(matches!(stream.next(), Some(Err(_))));
        assert!(stream.next().is_none());
    }
}
