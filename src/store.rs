use std::fs;
use std::path::Path;

use anyhow::Context as _;

use crate::records::Envelope;

// Two-space-indented JSON with a trailing newline; replaces any previous
// file.
pub fn write_envelope(path: &Path, envelope: &Envelope) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir: {}", parent.display()))?;
    }

    let mut json = serde_json::to_vec_pretty(envelope).context("serialize envelope")?;
    json.push(b'\n');
    fs::write(path, json).with_context(|| format!("write envelope: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::records::Record;

    #[test]
    fn write_envelope_creates_dirs_and_rewrites_identically() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("results").join("things.json");

        let envelope = Envelope::new(
            "things",
            vec![Record::from_fields(IndexMap::from([(
                "name".to_owned(),
                "one".to_owned(),
            )]))],
        );

        write_envelope(&path, &envelope)?;
        let first = fs::read(&path)?;
        assert!(first.ends_with(b"\n"));
        assert!(first.starts_with(b"{\n  \"things\": ["));

        write_envelope(&path, &envelope)?;
        assert_eq!(fs::read(&path)?, first);
        Ok(())
    }

    #[test]
    fn empty_envelope_is_still_written() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("empty.json");

        write_envelope(&path, &Envelope::new("events", Vec::new()))?;
        assert_eq!(fs::read_to_string(&path)?, "{\n  \"events\": []\n}\n");
        Ok(())
    }
}
