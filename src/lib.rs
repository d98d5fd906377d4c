//! Offline build steps for the photos-with-names gallery.
//!
//! `make_people_js` turns the names spreadsheet into `js/people-data.js` and
//! fills in missing thumbnails; `make_people_index` re-derives the JSON index
//! from that JS file.

pub mod settings;
pub mod env;
pub mod error;
pub mod export;
pub mod extract;
pub mod ingest;
pub mod jsdata;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod sheet;
pub mod thumbs;

pub use settings::Settings;
pub use error::{PipelineError, Result};
pub use record::{Dataset, PersonRecord};
