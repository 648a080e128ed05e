use cloudendpoints::{GroupedEndpoints, Result};
use log::info;
use std::path::Path;

/*-------------------------------------------------------------------------------------------------
  Save Grouped Ranges to CSV File
-------------------------------------------------------------------------------------------------*/

pub fn save(groups: &GroupedEndpoints, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    // Write header
    writer.serialize(["Service Area", "IP Range"])?;

    // Write range records
    for (service_area, ranges) in groups.iter() {
        for range in ranges {
            writer.serialize((service_area, range))?;
        }
    }

    writer
        .flush()
        .map_err(|error| cloudendpoints::Error::Io {
            path: path.to_path_buf(),
            source: error,
        })?;

    info!("Saved {} range(s) to {:?}", groups.range_count(), path);
    Ok(())
}
