use anyhow::Context;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use super::entity::OsmEntity;

/// Lazily decoded OSM PBF extract.
///
/// The file handle lives as long as the source and is closed when it is dropped, whichever way
/// the run ends.
pub struct PbfSource {
    filepath: PathBuf,
    reader: osmpbfreader::OsmPbfReader<BufReader<File>>,
}

impl PbfSource {
    pub fn open(filepath: &Path) -> anyhow::Result<Self> {
        let file = File::open(filepath)
            .with_context(|| format!("Opening OSM PBF file {:?}", filepath))?;
        Ok(Self {
            filepath: filepath.to_path_buf(),
            reader: osmpbfreader::OsmPbfReader::new(BufReader::new(file)),
        })
    }

    /// Entities in file order, decoded one block at a time.
    pub fn entities(&mut self) -> impl Iterator<Item = anyhow::Result<OsmEntity>> + '_ {
        let filepath = &self.filepath;
        self.reader.iter().map(move |obj| {
            obj.map(OsmEntity::from)
                .with_context(|| format!("Decoding OSM PBF file {:?}", filepath))
        })
    }
}
