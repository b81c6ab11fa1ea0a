use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// The `.prj` file GIS tools look for next to a shapefile.
pub fn prj_path_for(shapefile_path: &Path) -> PathBuf {
    shapefile_path.with_extension("prj")
}

/// Writes the WKT to the `.prj` file, replacing any the driver produced.
pub fn write_prj_file(prj_filepath: &Path, wkt: &str) -> io::Result<()> {
    fs::write(prj_filepath, wkt)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use testdir::testdir;

    use super::{prj_path_for, write_prj_file};
    use crate::crs::WGS84_ESRI_WKT;

    #[test]
    fn test_prj_path_for() {
        assert_eq!(
            prj_path_for(&PathBuf::from("data/luxembourg-powerlines.shp")),
            PathBuf::from("data/luxembourg-powerlines.prj")
        );
    }

    #[test]
    fn test_write_prj_file_overwrites() {
        let test_dir = testdir!();
        let prj_filepath = test_dir.join("output.prj");
        fs::write(&prj_filepath, "GEOGCS[\"WGS 84\"]").unwrap();

        write_prj_file(&prj_filepath, WGS84_ESRI_WKT).unwrap();
        assert_eq!(fs::read_to_string(&prj_filepath).unwrap(), WGS84_ESRI_WKT);
    }
}
