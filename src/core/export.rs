use crate::core::errors::{Error, Result};
use crate::core::reorganize::GroupedEndpoints;
use log::{debug, info};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/*-------------------------------------------------------------------------------------------------
  Local Export
-------------------------------------------------------------------------------------------------*/

/// Create the artifacts directory (and any missing parents).
pub fn ensure_directory(directory: &Path) -> Result<()> {
    fs::create_dir_all(directory).map_err(|error| Error::io(directory, error))
}

/// Write one `{prefix}{name}.txt` file per group into `directory`, one IP range per line.
/// Path separators in the prefix or name are replaced with `_`. Existing files are overwritten.
/// Returns the paths written, in group order.
pub fn export_grouped(
    groups: &GroupedEndpoints,
    prefix: &str,
    directory: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(groups.len());
    for (name, ranges) in groups.iter() {
        let path = directory.join(group_file_name(prefix, name));
        write_lines(&path, ranges)?;
        written.push(path);
    }
    info!(
        "Exported {} group(s) to {:?}",
        written.len(),
        directory
    );
    Ok(written)
}

/// Write `items` to `directory/filename`, one item per line.
pub fn export_flat_list(items: &[String], filename: &str, directory: &Path) -> Result<PathBuf> {
    let path = directory.join(filename);
    write_lines(&path, items)?;
    info!("Exported {} item(s) to {:?}", items.len(), path);
    Ok(path)
}

/// File name for a group; never contains a path separator.
fn group_file_name(prefix: &str, name: &str) -> String {
    format!("{prefix}{name}.txt")
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    debug!("Writing {} line(s) to {:?}", lines.len(), path);

    let file = fs::File::create(path).map_err(|error| Error::io(path, error))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{line}").map_err(|error| Error::io(path, error))?;
    }
    writer.flush().map_err(|error| Error::io(path, error))
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
