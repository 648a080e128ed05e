use crate::core::errors::{Error, Result};
use crate::core::utils::join_blob_name;
use chrono::{DateTime, TimeZone};
use log::{debug, info};
use std::fmt::{Display, Write as _};
use std::fs;
use std::path::Path;

/*-------------------------------------------------------------------------------------------------
  Index Page
-------------------------------------------------------------------------------------------------*/

const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Names of the files in `directory`, sorted descending by name.
pub fn list_artifacts(directory: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(directory).map_err(|error| Error::io(directory, error))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|error| Error::io(directory, error))?;
        let file_type = entry
            .file_type()
            .map_err(|error| Error::io(entry.path(), error))?;
        if file_type.is_file() {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    files.sort_by(|a, b| b.cmp(a));
    Ok(files)
}

/// Render the HTML page linking each file under `artifacts_dir_name/` as a download.
pub fn render<Tz>(files: &[String], artifacts_dir_name: &str, generated_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut page = String::from("<html>\n<head>\n</head>\n<body>\n");
    let _ = write!(
        page,
        " Generated date:<br>{}<br><br>Generated list:<br>\n",
        generated_at.format(GENERATED_AT_FORMAT)
    );
    for file in files {
        let href = join_blob_name([artifacts_dir_name, file.as_str()]);
        let _ = writeln!(
            page,
            "<a href=\"{}\" download>{}</a>\n <br>",
            escape_html(&href),
            escape_html(file)
        );
    }
    page.push_str("</body></html>");
    page
}

/// List `artifacts_dir`, render the page and write it to `main_page_path`. Returns the HTML.
pub fn write<Tz>(
    artifacts_dir: &Path,
    main_page_path: &Path,
    generated_at: &DateTime<Tz>,
) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let files = list_artifacts(artifacts_dir)?;
    debug!("Index page lists {} file(s)", files.len());

    let artifacts_dir_name = artifacts_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let page = render(&files, &artifacts_dir_name, generated_at);

    fs::write(main_page_path, &page).map_err(|error| Error::io(main_page_path, error))?;
    info!("Wrote index page {:?}", main_page_path);
    Ok(page)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
