use anyhow::anyhow;

pub type EpsgCode = u32;

/// WGS84 longitude/latitude, the coordinate system OSM data is published in.
pub const WGS84_EPSG_CODE: EpsgCode = 4326;

/// ESRI flavoured WKT for WGS84, as written by ArcGIS' Define Projection tool.
///
/// The shapefile format has no field for the CRS, GIS tools look for this string in a `.prj`
/// file next to the `.shp`.
pub const WGS84_ESRI_WKT: &str = "GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],PRIMEM[\"Greenwich\",0.0],UNIT[\"Degree\",0.0174532925199433]]";

pub fn spatial_ref_from_epsg(code: EpsgCode) -> anyhow::Result<gdal::spatial_ref::SpatialRef> {
    gdal::spatial_ref::SpatialRef::from_epsg(code)
        .map_err(|err| anyhow!("Could not create SpatialRef from EPSG code {}. {}", code, err))
}

pub fn epsg_code_to_authority_string(code: EpsgCode) -> String {
    format!("EPSG:{}", code)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{
        epsg_code_to_authority_string, spatial_ref_from_epsg, EpsgCode, WGS84_EPSG_CODE,
        WGS84_ESRI_WKT,
    };

    #[rstest]
    #[case(4326, "EPSG:4326")]
    #[case(32654, "EPSG:32654")] // WGS 84 UTM zone 54N.
    fn test_epsg_code_to_authority_string(#[case] code: EpsgCode, #[case] expected: &str) {
        assert_eq!(epsg_code_to_authority_string(code), expected);
    }

    #[test]
    fn test_epsg_4326_is_geographic() {
        let spatial_ref = spatial_ref_from_epsg(WGS84_EPSG_CODE).unwrap();
        assert!(spatial_ref.is_geographic());
        assert_eq!(spatial_ref.auth_code().unwrap(), 4326);
    }

    #[test]
    fn test_esri_wkt_describes_wgs84() {
        assert!(WGS84_ESRI_WKT.starts_with("GEOGCS[\"GCS_WGS_1984\""));
        assert!(WGS84_ESRI_WKT.contains("6378137.0,298.257223563"));
    }
}
