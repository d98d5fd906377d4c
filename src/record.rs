use serde::{Deserialize, Serialize};

/// One row of the gallery dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub surname: String,
    pub full_name: String,
    pub photo_file: String,
}

/// Records in spreadsheet row order, which is also the display order.
pub type Dataset = Vec<PersonRecord>;

impl PersonRecord {
    pub fn new(
        surname: impl Into<String>,
        full_name: impl Into<String>,
        photo_file: impl Into<String>,
    ) -> Self {
        PersonRecord {
            surname: surname.into(),
            full_name: full_name.into(),
            photo_file: photo_file.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.surname.is_empty() && self.full_name.is_empty() && self.photo_file.is_empty()
    }
}
