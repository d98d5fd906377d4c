use serde::Serialize;
use serde_json::ser::Formatter;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::record::PersonRecord;

/// Single-line JSON with `", "` and `": "` separators, the layout the site's
/// existing `people-data.js` was written in.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn to_spaced_line<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// `const <binding> = [` / one JSON object per line, comma-terminated / `];`
pub fn render_js(binding: &str, records: &[PersonRecord]) -> Result<String> {
    let mut out = format!("const {} = [\n", binding);
    for rec in records {
        out.push_str("  ");
        out.push_str(&to_spaced_line(rec)?);
        out.push_str(",\n");
    }
    out.push_str("];\n");
    Ok(out)
}

/// Always rewrites the whole file.
pub fn write_js(path: &Path, binding: &str, records: &[PersonRecord]) -> Result<()> {
    let text = render_js(binding, records)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    fs::write(path, text).map_err(|e| PipelineError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_record_per_line() {
        let text = render_js(
            "people",
            &[
                PersonRecord::new("Smith", "Jane Smith", "jane.jpg"),
                PersonRecord::new("Ó Briain", "Séan \"Jock\" Ó Briain", ""),
            ],
        )
        .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "const people = [");
        assert_eq!(
            lines[1],
            r#"  {"surname": "Smith", "fullName": "Jane Smith", "photoFile": "jane.jpg"},"#
        );
        assert_eq!(
            lines[2],
            r#"  {"surname": "Ó Briain", "fullName": "Séan \"Jock\" Ó Briain", "photoFile": ""},"#
        );
        assert_eq!(lines[3], "];");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn nested_values_use_the_same_separators() {
        let line = to_spaced_line(&serde_json::json!({"a": [1, 2], "b": {}})).unwrap();
        assert_eq!(line, r#"{"a": [1, 2], "b": {}}"#);
    }

    #[test]
    fn empty_dataset_is_still_an_array() {
        assert_eq!(render_js("people", &[]).unwrap(), "const people = [\n];\n");
    }

    #[test]
    fn write_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("js").join("people-data.js");
        write_js(&path, "people", &[PersonRecord::new("A", "B", "c.jpg")]).unwrap();
        write_js(&path, "people", &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "const people = [\n];\n");
    }
}
