use serde::Deserialize;

use super::entity::{OsmEntity, OsmEntityKind};

/// `key=value` tag a way must carry to be kept.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TagPredicate {
    pub key: String,
    pub value: String,
}

impl Default for TagPredicate {
    fn default() -> Self {
        Self {
            key: "power".to_string(),
            value: "line".to_string(),
        }
    }
}

impl TagPredicate {
    pub fn matches(&self, entity: &OsmEntity) -> bool {
        entity.has_tag(&self.key, &self.value)
    }
}

/// Keeps all nodes, since they may be referenced by a kept way, and the ways matching the
/// predicate. Relations are never kept.
pub fn keep_entity(entity: &OsmEntity, predicate: &TagPredicate) -> bool {
    match entity.kind() {
        OsmEntityKind::Node => true,
        OsmEntityKind::Way => predicate.matches(entity),
        OsmEntityKind::Relation => false,
    }
}

/// Streaming filter over decoded entities. Decoding errors are passed through so the consumer
/// aborts on them.
pub fn filter_entities<'a, I>(
    entities: I,
    predicate: &'a TagPredicate,
) -> impl Iterator<Item = anyhow::Result<OsmEntity>> + 'a
where
    I: Iterator<Item = anyhow::Result<OsmEntity>> + 'a,
{
    entities.filter(move |entity| match entity {
        Ok(entity) => keep_entity(entity, predicate),
        Err(_) => true,
    })
}
