use anyhow::anyhow;
use std::path::{Path, PathBuf};

use crate::geofile::{gdal_geofile::GdalDriverType, prj::prj_path_for};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub geofile: PathBuf,
    /// Only set for shapefiles, other formats store the CRS themselves.
    pub prj: Option<PathBuf>,
}

/// Base name of an OSM extract: `luxembourg-latest.osm.pbf` becomes `luxembourg-latest`.
pub fn input_base_name(input_filepath: &Path) -> anyhow::Result<String> {
    let stem = input_filepath
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| anyhow!("Cannot derive a file name from {:?}", input_filepath))?;
    Ok(stem.replace(".osm", ""))
}

/// Output files are placed next to the input.
pub fn output_paths(
    input_filepath: &Path,
    suffix: &str,
    driver: GdalDriverType,
) -> anyhow::Result<OutputPaths> {
    let folder = input_filepath.parent().unwrap_or_else(|| Path::new(""));
    let out_name = format!("{}{}", input_base_name(input_filepath)?, suffix);
    let geofile = folder.join(format!("{}.{}", out_name, driver.extension()));
    let prj = match driver {
        GdalDriverType::Shapefile => Some(prj_path_for(&geofile)),
        GdalDriverType::GeoPackage | GdalDriverType::GeoJson => None,
    };
    Ok(OutputPaths { geofile, prj })
}
