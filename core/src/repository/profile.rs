use crate::model::profile::Profile;
use crate::repository::traits::ProfileRepository;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const PROFILE_FILE_NAME: &str = "profile.json";

#[derive(Clone)]
pub struct FileProfileRepository {
    file_path: PathBuf,
}

impl FileProfileRepository {
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        Ok(Self {
            file_path: data_dir.join(PROFILE_FILE_NAME),
        })
    }
}

impl ProfileRepository for FileProfileRepository {
    fn load(&self) -> Result<Profile> {
        if self.file_path.exists() {
            let content = fs::read_to_string(&self.file_path)?;
            let profile: Profile = serde_json::from_str(&content)?;
            Ok(profile)
        } else {
            debug!("No profile at {}, using defaults", self.file_path.display());
            Ok(Profile::default())
        }
    }

    fn save(&self, profile: &Profile) -> Result<()> {
        let content = serde_json::to_string_pretty(profile)?;
        fs::write(&self.file_path, content)?;
        debug!("Saved profile to {}", self.file_path.display());
        Ok(())
    }
}
