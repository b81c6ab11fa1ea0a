use std::collections::HashMap;

pub type OsmId = i64;

/// OSM tags. PBF files do not distinguish an empty tag set from a missing one, entities store
/// `None` in both cases.
pub type Tags = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsmEntityKind {
    Node,
    Way,
    Relation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OsmNode {
    pub id: OsmId,
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
    pub tags: Option<Tags>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OsmWay {
    pub id: OsmId,
    /// Referenced node ids, in order.
    pub nodes: Vec<OsmId>,
    pub tags: Option<Tags>,
}

impl OsmWay {
    pub fn is_closed(&self) -> bool {
        self.nodes.len() >= 4 && self.nodes.first() == self.nodes.last()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OsmRelation {
    pub id: OsmId,
    pub tags: Option<Tags>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OsmEntity {
    Node(OsmNode),
    Way(OsmWay),
    Relation(OsmRelation),
}

impl OsmEntity {
    pub fn id(&self) -> OsmId {
        match self {
            OsmEntity::Node(node) => node.id,
            OsmEntity::Way(way) => way.id,
            OsmEntity::Relation(relation) => relation.id,
        }
    }

    pub fn kind(&self) -> OsmEntityKind {
        match self {
            OsmEntity::Node(_) => OsmEntityKind::Node,
            OsmEntity::Way(_) => OsmEntityKind::Way,
            OsmEntity::Relation(_) => OsmEntityKind::Relation,
        }
    }

    pub fn tags(&self) -> Option<&Tags> {
        match self {
            OsmEntity::Node(node) => node.tags.as_ref(),
            OsmEntity::Way(way) => way.tags.as_ref(),
            OsmEntity::Relation(relation) => relation.tags.as_ref(),
        }
    }

    /// Whether the entity is tagged `key=value`. Entities without tags never match.
    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.tags()
            .and_then(|tags| tags.get(key))
            .map_or(false, |tag_value| tag_value == value)
    }
}

fn convert_tags(tags: &osmpbfreader::Tags) -> Option<Tags> {
    if tags.is_empty() {
        return None;
    }
    Some(
        tags.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
    )
}

impl From<osmpbfreader::OsmObj> for OsmEntity {
    fn from(value: osmpbfreader::OsmObj) -> Self {
        match value {
            osmpbfreader::OsmObj::Node(node) => OsmEntity::Node(OsmNode {
                id: node.id.0,
                lon: node.lon(),
                lat: node.lat(),
                tags: convert_tags(&node.tags),
            }),
            osmpbfreader::OsmObj::Way(way) => OsmEntity::Way(OsmWay {
                id: way.id.0,
                nodes: way.nodes.iter().map(|node_id| node_id.0).collect(),
                tags: convert_tags(&way.tags),
            }),
            osmpbfreader::OsmObj::Relation(relation) => OsmEntity::Relation(OsmRelation {
                id: relation.id.0,
                tags: convert_tags(&relation.tags),
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_entities {
    use super::{OsmEntity, OsmId, OsmNode, OsmRelation, OsmWay, Tags};

    pub fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    pub fn node(id: OsmId, lon: f64, lat: f64) -> OsmEntity {
        OsmEntity::Node(OsmNode {
            id,
            lon,
            lat,
            tags: None,
        })
    }

    pub fn tagged_node(id: OsmId, lon: f64, lat: f64, pairs: &[(&str, &str)]) -> OsmEntity {
        OsmEntity::Node(OsmNode {
            id,
            lon,
            lat,
            tags: Some(tags(pairs)),
        })
    }

    pub fn way(id: OsmId, nodes: &[OsmId], pairs: &[(&str, &str)]) -> OsmEntity {
        OsmEntity::Way(OsmWay {
            id,
            nodes: nodes.to_vec(),
            tags: if pairs.is_empty() {
                None
            } else {
                Some(tags(pairs))
            },
        })
    }

    pub fn relation(id: OsmId, pairs: &[(&str, &str)]) -> OsmEntity {
        OsmEntity::Relation(OsmRelation {
            id,
            tags: Some(tags(pairs)),
        })
    }
}
