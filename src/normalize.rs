//! Photo file name clean-up for values typed into the spreadsheet.

use regex::Regex;
use std::sync::OnceLock;

use crate::settings::Settings;

fn extension_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.[A-Za-z0-9]{2,4}$").unwrap())
}

/// Maps a raw cell to the file name used under the full/ and thumbnails/ dirs.
///
/// - surrounding whitespace is trimmed, an empty cell stays empty
/// - leading `full/`, `thumbnails/` (any case, repeated) are dropped
/// - a name without a 2-4 char extension gets the default one
/// - case is never changed, the site is served from a case-sensitive host
#[derive(Debug, Clone)]
pub struct FilenameNormalizer {
    prefix: Option<Regex>,
    default_extension: String,
}

impl FilenameNormalizer {
    pub fn new<S: AsRef<str>>(subdirs: &[S], default_extension: &str) -> Self {
        let alternatives: Vec<String> = subdirs
            .iter()
            .map(|s| s.as_ref().trim_matches('/'))
            .filter(|s| !s.is_empty())
            .map(regex::escape)
            .collect();
        let prefix = if alternatives.is_empty() {
            None
        } else {
            let pattern = format!(r"(?i)^(?:{})/", alternatives.join("|"));
            Some(Regex::new(&pattern).expect("subdir names are escaped"))
        };
        FilenameNormalizer {
            prefix,
            default_extension: default_extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.photo_subdirs, &settings.default_extension)
    }

    pub fn normalize(&self, raw: &str) -> String {
        let mut name = raw.trim();
        if let Some(re) = &self.prefix {
            while let Some(m) = re.find(name) {
                name = name[m.end()..].trim_start();
            }
        }
        if name.is_empty() {
            return String::new();
        }
        if extension_re().is_match(name) || self.default_extension.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", name, self.default_extension)
        }
    }
}

impl Default for FilenameNormalizer {
    fn default() -> Self {
        Self::new(&["full", "thumbnails"], "jpg")
    }
}

/// [`FilenameNormalizer::normalize`] with the stock folder names and `.jpg`.
pub fn normalize_photo_file(raw: &str) -> String {
    static DEFAULT: OnceLock<FilenameNormalizer> = OnceLock::new();
    DEFAULT.get_or_init(FilenameNormalizer::default).normalize(raw)
}
