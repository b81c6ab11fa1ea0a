use anyhow::{anyhow, Context};
use gdal::vector::LayerAccess;
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Deserialize;
use std::path::Path;

use super::feature::Feature;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GdalDriverType {
    #[default]
    #[serde(rename = "ESRI Shapefile")]
    Shapefile,
    #[serde(rename = "GPKG")]
    GeoPackage,
    #[serde(rename = "GeoJSON")]
    GeoJson,
}

impl GdalDriverType {
    pub fn name(&self) -> &'static str {
        match self {
            GdalDriverType::Shapefile => "ESRI Shapefile",
            GdalDriverType::GeoPackage => "GPKG",
            GdalDriverType::GeoJson => "GeoJSON",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            GdalDriverType::Shapefile => "shp",
            GdalDriverType::GeoPackage => "gpkg",
            GdalDriverType::GeoJson => "geojson",
        }
    }
}

fn layer_type(geometry: &geo::Geometry) -> anyhow::Result<gdal::vector::OGRwkbGeometryType::Type> {
    use gdal::vector::OGRwkbGeometryType::*;
    match geometry {
        geo::Geometry::Point(_) => Ok(wkbPoint),
        geo::Geometry::LineString(_) => Ok(wkbLineString),
        geo::Geometry::Polygon(_) => Ok(wkbPolygon),
        geo::Geometry::MultiPoint(_) => Ok(wkbMultiPoint),
        geo::Geometry::MultiLineString(_) => Ok(wkbMultiLineString),
        geo::Geometry::MultiPolygon(_) => Ok(wkbMultiPolygon),
        _ => Err(anyhow!("Cannot write geometry type {:?} to file.", geometry)),
    }
}

/// Field names of the layer, taken from the first feature. Every other feature must have the same
/// geometry type and attribute names, since formats like shapefiles have one fixed record layout.
fn layer_schema(features: &[Feature]) -> anyhow::Result<Vec<String>> {
    let first = features
        .first()
        .ok_or_else(|| anyhow!("Cannot derive a layer schema without features"))?;
    let field_names = first.field_names();
    let geometry_kind = std::mem::discriminant(&first.geometry);

    let mismatch = features.par_iter().position_first(|feature| {
        std::mem::discriminant(&feature.geometry) != geometry_kind
            || feature.field_names() != field_names
    });
    if let Some(index) = mismatch {
        return Err(anyhow!(
            "Feature {} does not match the layer schema: expected {:?} with fields {:?}, got {:?}",
            index,
            first.geometry,
            field_names,
            features[index].field_names()
        ));
    }
    Ok(field_names.into_iter().map(String::from).collect())
}

/// Names of the fields the driver actually created for `field_names`.
fn layer_field_names(
    layer: &gdal::vector::Layer,
    field_names: &[String],
) -> anyhow::Result<Vec<String>> {
    let layer_field_names: Vec<String> = layer.defn().fields().map(|field| field.name()).collect();
    if layer_field_names.len() != field_names.len() {
        return Err(anyhow!(
            "Expected {} fields in the layer, found {:?}",
            field_names.len(),
            layer_field_names
        ));
    }
    for (name, layer_name) in field_names.iter().zip(&layer_field_names) {
        if name != layer_name {
            log::warn!("Field {} is stored as {}", name, layer_name);
        }
    }
    Ok(layer_field_names)
}

/// Writes all features to a single layer. Without an explicit `crs`, the SRID of the first feature
/// is used, falling back to WGS84. Nothing is written when there are no features.
pub fn write_features_to_geofile(
    features: &[Feature],
    output_filepath: &Path,
    crs: Option<&gdal::spatial_ref::SpatialRef>,
    driver: GdalDriverType,
    layer_creation_options: &[&str],
    show_progress: bool,
) -> anyhow::Result<()> {
    if features.is_empty() {
        return Ok(());
    }
    let gdal_driver =
        gdal::DriverManager::get_driver_by_name(driver.name()).context("Getting GDAL driver")?;

    let layer_type = layer_type(&features[0].geometry)?;
    let field_names = layer_schema(features)?;

    let crs = match crs {
        Some(crs) => crs.clone(),
        None => crate::crs::spatial_ref_from_epsg(
            features[0].srid.unwrap_or(crate::crs::WGS84_EPSG_CODE),
        )?,
    };
    let crs_name = crs.name()?;
    log::debug!("Using spatial ref {} for writing geofile", crs_name);

    let layer_name = output_filepath
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("");
    let mut dataset = gdal_driver
        .create_vector_only(output_filepath)
        .with_context(|| format!("Creating {:?}", output_filepath))?;
    let layer_options = gdal::LayerOptions {
        name: layer_name,
        srs: Some(&crs),
        ty: layer_type,
        options: if layer_creation_options.is_empty() {
            None
        } else {
            Some(layer_creation_options)
        },
    };

    let mut layer = dataset.create_layer(layer_options)?;

    log::info!("Setting up fields {:?}", field_names);
    let field_definitions: Vec<(&str, gdal::vector::OGRFieldType::Type)> = field_names
        .iter()
        .map(|field_name| (field_name as &str, gdal::vector::OGRFieldType::OFTString))
        .collect();
    layer.create_defn_fields(&field_definitions)?;
    // Drivers may rename fields, shapefiles cut names to 10 characters. Fields keep creation
    // order, so the n-th layer field holds the n-th attribute.
    let layer_field_names = layer_field_names(&layer, &field_names)?;
    let layer_field_names: Vec<&str> = layer_field_names.iter().map(|name| name as &str).collect();

    log::info!(
        "Writing {} features to {:?}",
        features.len(),
        output_filepath
    );
    unsafe {
        // Start a transaction in case the driver supports transactions, e.g. GeoPackage.
        // Committing all features once as opposed to per-feature is a massive speedup for these drivers.
        gdal_sys::OGR_L_StartTransaction(layer.c_layer());
    };
    let bar = if show_progress {
        ProgressBar::new(features.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    for feature in features {
        let wkb = wkb::geom_to_wkb(&feature.geometry)
            .map_err(|err| anyhow!("Could not write geometry to WKB, {:?}", err))?;
        let geometry = gdal::vector::Geometry::from_wkb(&wkb)?;

        match &feature.attributes {
            Some(attributes) if !field_names.is_empty() => {
                let values: Vec<gdal::vector::FieldValue> = field_names
                    .iter()
                    .map(|name| {
                        gdal::vector::FieldValue::StringValue(
                            attributes.get(name).cloned().unwrap_or_default(),
                        )
                    })
                    .collect();
                layer.create_feature_fields(geometry, &layer_field_names, &values)?;
            }
            _ => layer.create_feature(geometry)?,
        }

        bar.inc(1);
    }
    unsafe {
        gdal_sys::OGR_L_CommitTransaction(layer.c_layer());
    };
    bar.finish_and_clear();
    Ok(())
}
