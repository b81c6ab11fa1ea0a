pub mod output;
pub mod stages;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::config::Config;
use crate::crs::{epsg_code_to_authority_string, WGS84_EPSG_CODE, WGS84_ESRI_WKT};
use crate::error::{PipelineError, PipelineResult};
use crate::geofile::{
    feature::Feature, gdal_geofile::write_features_to_geofile, prj::write_prj_file,
};
use crate::osm::{
    conversion::IntoFeatureStream, entity::OsmEntity, filter::filter_entities,
    pbf_source::PbfSource,
};
use output::{input_base_name, output_paths, OutputPaths};
use stages::{filter_line_strings, AttributeNormalizer};

#[derive(Debug)]
pub struct PipelineSummary {
    pub entities_read: u64,
    pub features_written: usize,
    /// `None` when nothing matched and writing was skipped.
    pub output: Option<OutputPaths>,
}

/// Filters, converts and normalizes an entity stream into the feature collection to write.
pub fn convert_entities<I>(entities: I, config: &Config) -> anyhow::Result<Vec<Feature>>
where
    I: Iterator<Item = anyhow::Result<OsmEntity>>,
{
    let filtered = filter_entities(entities, &config.filter);
    let features = filter_line_strings(filtered.into_features());
    AttributeNormalizer::new(config.attributes.clone(), WGS84_EPSG_CODE).collect(features)
}

/// Writes the collection plus, for shapefiles, the `.prj` file. Returns whether anything was
/// written: an empty collection has no record to derive the header from, so it is skipped.
pub fn write_collection(
    features: &[Feature],
    paths: &OutputPaths,
    config: &Config,
) -> anyhow::Result<bool> {
    if features.is_empty() {
        log::warn!(
            "No ways tagged {}={}, skipping {:?}",
            config.filter.key,
            config.filter.value,
            paths.geofile
        );
        return Ok(false);
    }
    let layer_creation_options = config.layer_creation_options();
    let layer_creation_options: Vec<&str> = layer_creation_options
        .iter()
        .map(|option| option as &str)
        .collect();
    write_features_to_geofile(
        features,
        &paths.geofile,
        None,
        config.driver,
        &layer_creation_options,
        config.progress,
    )?;
    if let Some(prj_filepath) = &paths.prj {
        log::info!(
            "Writing {} projection to {:?}",
            epsg_code_to_authority_string(WGS84_EPSG_CODE),
            prj_filepath
        );
        write_prj_file(prj_filepath, WGS84_ESRI_WKT)
            .with_context(|| format!("Writing {:?}", prj_filepath))?;
    }
    Ok(true)
}

fn entity_progress_bar(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {human_pos} entities read ({per_sec})")
    {
        bar.set_style(style);
    }
    bar
}

/// Converts the OSM PBF extract at `input_filepath` into power line features written next to it.
pub fn run(input_filepath: &Path, config: &Config) -> PipelineResult<PipelineSummary> {
    if !input_filepath.is_file() {
        return Err(PipelineError::NotFound(input_filepath.to_path_buf()));
    }
    let paths = output_paths(input_filepath, &config.output_suffix, config.driver)?;

    let mut source = PbfSource::open(input_filepath)?;
    let bar = entity_progress_bar(config.progress);
    let mut entities_read: u64 = 0;
    let features = convert_entities(
        source.entities().inspect(|_| {
            entities_read += 1;
            bar.inc(1);
        }),
        config,
    );
    bar.finish_and_clear();
    drop(source);
    let features = features?;
    log::info!(
        "{} features read from {}",
        features.len(),
        input_base_name(input_filepath)?
    );

    let written = write_collection(&features, &paths, config)?;
    Ok(PipelineSummary {
        entities_read,
        features_written: if written { features.len() } else { 0 },
        output: if written { Some(paths) } else { None },
    })
}
