use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Paths and constants shared by both pipelines.
///
/// Every relative path is resolved against `repo_root` at use time, so a test
/// only has to point `repo_root` at a temporary directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub repo_root: PathBuf,
    pub input_sheet: PathBuf,
    /// First sheet of the workbook when unset.
    pub sheet_name: Option<String>,
    pub output_js: PathBuf,
    /// Name bound by `const <binding> = [...]` in the JS data file.
    pub binding: String,
    pub full_dir: PathBuf,
    pub thumb_dir: PathBuf,
    pub output_json: PathBuf,
    pub thumb_tool: String,
    /// ImageMagick geometry, `420x` = max width 420, keep aspect.
    pub thumb_geometry: String,
    pub thumb_quality: u32,
    /// Folder names users accidentally paste in front of a photo file name.
    pub photo_subdirs: Vec<String>,
    pub default_extension: String,
    /// How many leading entries of the parsed array are checked to be objects.
    pub validate_sample: usize,
    pub isolation_var: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            repo_root: PathBuf::from("."),
            input_sheet: PathBuf::from("data/photo_names_sorted.ods"),
            sheet_name: None,
            output_js: PathBuf::from("js/people-data.js"),
            binding: "people".to_string(),
            full_dir: PathBuf::from("photos-with-names/full"),
            thumb_dir: PathBuf::from("photos-with-names/thumbnails"),
            output_json: PathBuf::from("photos-with-names/people-index.json"),
            thumb_tool: "magick".to_string(),
            thumb_geometry: "420x".to_string(),
            thumb_quality: 82,
            photo_subdirs: vec!["full".to_string(), "thumbnails".to_string()],
            default_extension: "jpg".to_string(),
            validate_sample: 10,
            isolation_var: "VIRTUAL_ENV".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then the optional settings file, then `GALLERY_*` variables.
    pub fn load(file: Option<&Path>) -> Result<Settings> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        let cfg = builder
            .add_source(
                Environment::with_prefix("GALLERY")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("photo_subdirs"),
            )
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.repo_root.join(path)
        }
    }

    pub fn input_sheet_path(&self) -> PathBuf {
        self.resolve(&self.input_sheet)
    }

    pub fn output_js_path(&self) -> PathBuf {
        self.resolve(&self.output_js)
    }

    pub fn full_dir_path(&self) -> PathBuf {
        self.resolve(&self.full_dir)
    }

    pub fn thumb_dir_path(&self) -> PathBuf {
        self.resolve(&self.thumb_dir)
    }

    pub fn output_json_path(&self) -> PathBuf {
        self.resolve(&self.output_json)
    }

    /// Settings rooted at `root`, everything else default.
    pub fn with_root(root: impl Into<PathBuf>) -> Settings {
        Settings {
            repo_root: root.into(),
            ..Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn relative_paths_resolve_under_root() {
        let s = Settings::with_root("/site");
        assert_eq!(s.output_js_path(), PathBuf::from("/site/js/people-data.js"));
        assert_eq!(
            s.thumb_dir_path(),
            PathBuf::from("/site/photos-with-names/thumbnails")
        );
    }

    #[test]
    fn absolute_paths_are_kept() {
        let mut s = Settings::with_root("/site");
        s.output_json = PathBuf::from("/tmp/index.json");
        assert_eq!(s.output_json_path(), PathBuf::from("/tmp/index.json"));
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery.toml");
        fs::write(
            &path,
            "repo_root = \"/srv/site\"\nthumb_quality = 70\nvalidate_sample = 3\n",
        )
        .unwrap();

        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.repo_root, PathBuf::from("/srv/site"));
        assert_eq!(s.thumb_quality, 70);
        assert_eq!(s.validate_sample, 3);
        assert_eq!(s.binding, "people");
        assert_eq!(s.thumb_geometry, "420x");
    }

    #[test]
    fn missing_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
