use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::model::diet::DietState;
use crate::repository::traits::DietRepository;

const DEFAULT_FILE_NAME: &str = "diet.json";

#[derive(Clone, Debug)]
pub struct FileDietRepository {
    file_path: PathBuf,
}

impl FileDietRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&path)
            .with_context(|| format!("Could not create data directory {}", path.display()))?;
        path.push(DEFAULT_FILE_NAME);

        Ok(FileDietRepository { file_path: path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(".dietlog"))
}

impl DietRepository for FileDietRepository {
    fn load(&self) -> Result<Option<DietState>> {
        let file = match File::open(&self.file_path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let reader = BufReader::new(file);
        let state = serde_json::from_reader(reader)
            .with_context(|| format!("Could not parse {}", self.file_path.display()))?;
        Ok(Some(state))
    }

    fn save(&self, state: &DietState) -> Result<()> {
        // Write next to the target, then rename over it.
        let tmp_path = self.file_path.with_extension("json.tmp");
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, state)?;
        writer.flush()?;
        drop(writer);
        fs::rename(&tmp_path, &self.file_path)?;
        Ok(())
    }
}
