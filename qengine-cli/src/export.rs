//! CSV export of query answers, one record per query.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use qengine_core::{Dictionary, QueryResult};

/// Writes each result as a `;`-separated record of ids, or of terms when a
/// dictionary is given.
pub fn write_results<W: Write>(out: W, results: &[QueryResult], dictionary: Option<&Dictionary>) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_writer(out);
    for result in results {
        if result.is_empty() {
            // An empty answer is an empty record, not one empty field.
            writer.flush()?;
            writer.get_mut().write_all(b"\n")?;
            continue;
        }
        match dictionary {
            Some(dictionary) => writer.write_record(result.terms(dictionary))?,
            None => writer.write_record(result.bindings.iter().map(u64::to_string))?,
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn export(path: &Path, results: &[QueryResult], dictionary: Option<&Dictionary>) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_results(file, results, dictionary).with_context(|| format!("writing {}", path.display()))
}
