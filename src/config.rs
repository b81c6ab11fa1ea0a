use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::{fs::read_to_string, path::Path};

use crate::geofile::{feature::Attributes, gdal_geofile::GdalDriverType};
use crate::osm::filter::TagPredicate;

fn default_attributes() -> Attributes {
    Attributes::from([("type".to_string(), "powerline".to_string())])
}

fn default_output_suffix() -> String {
    "-powerlines".to_string()
}

fn default_dbf_date_last_update() -> Option<String> {
    Some("1970-01-01".to_string())
}

fn default_progress() -> bool {
    true
}

/// Settings of a conversion run, read from an optional YAML file. Omitted keys take the defaults
/// for extracting power lines into a shapefile.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Tag a way must carry to be kept.
    #[serde(default)]
    pub filter: TagPredicate,
    /// Attribute table applied to every output feature.
    #[serde(default = "default_attributes")]
    pub attributes: Attributes,
    /// Appended to the input base name to build the output file name.
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
    #[serde(default)]
    pub driver: GdalDriverType,
    /// Last update date written to the DBF header (`YYYY-MM-DD`). Pinned so that repeated runs
    /// produce identical files. `null` lets GDAL use the current date.
    #[serde(default = "default_dbf_date_last_update")]
    pub dbf_date_last_update: Option<String>,
    #[serde(default = "default_progress")]
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter: TagPredicate::default(),
            attributes: default_attributes(),
            output_suffix: default_output_suffix(),
            driver: GdalDriverType::default(),
            dbf_date_last_update: default_dbf_date_last_update(),
            progress: default_progress(),
        }
    }
}

impl Config {
    pub fn from_file(config_filepath: &Path) -> anyhow::Result<Self> {
        if !config_filepath.exists() {
            return Err(anyhow!("Config file {:?} not found", config_filepath));
        }
        let config_contents = read_to_string(config_filepath)?;
        Self::from_yaml(&config_contents)
            .with_context(|| format!("Parsing config file {:?}", config_filepath))
    }

    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        if config.attributes.is_empty() {
            return Err(anyhow!("At least one output attribute is required"));
        }
        Ok(config)
    }

    /// GDAL layer creation options for the configured driver.
    pub fn layer_creation_options(&self) -> Vec<String> {
        match self.driver {
            GdalDriverType::Shapefile => {
                let mut options = vec!["ENCODING=UTF-8".to_string()];
                if let Some(date) = &self.dbf_date_last_update {
                    options.push(format!("DBF_DATE_LAST_UPDATE={}", date));
                }
                options
            }
            GdalDriverType::GeoPackage | GdalDriverType::GeoJson => Vec::new(),
        }
    }
}
