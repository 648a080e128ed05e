use crate::core::blob::{BlobStore, Publisher};
use crate::core::client::Client;
use crate::core::errors::Result;
use crate::core::export;
use crate::core::index_page;
use crate::core::reorganize::{self, GroupedEndpoints};
use chrono::Local;
use log::info;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/*-------------------------------------------------------------------------------------------------
  Export Options
-------------------------------------------------------------------------------------------------*/

/// Where and how an export run writes its files.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub working_path: PathBuf,
    pub artifacts_dir_name: String,
    pub main_page_name: String,
    pub office365_prefix: String,
    pub azure_prefix: String,
    /// Also write the flattened Office 365 URL list to this file in the artifacts directory.
    pub office365_urls_file: Option<String>,
    pub include_office365: bool,
    pub include_azure: bool,
}

impl ExportOptions {
    pub fn new<P: AsRef<Path>>(working_path: P) -> Self {
        Self {
            working_path: working_path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn artifacts_path(&self) -> PathBuf {
        self.working_path.join(&self.artifacts_dir_name)
    }

    pub fn main_page_path(&self) -> PathBuf {
        self.working_path.join(&self.main_page_name)
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            working_path: std::env::temp_dir(),
            artifacts_dir_name: "artifacts".to_string(),
            main_page_name: "main.html".to_string(),
            office365_prefix: String::new(),
            azure_prefix: "Azure Cloud: region ".to_string(),
            office365_urls_file: None,
            include_office365: true,
            include_azure: true,
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Export Report
-------------------------------------------------------------------------------------------------*/

/// The data and files produced by one export run.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub request_id: Option<Uuid>,
    pub office365_ips: Option<GroupedEndpoints>,
    pub office365_urls: Option<Vec<String>>,
    pub azure_ranges: Option<GroupedEndpoints>,
    pub written: Vec<PathBuf>,
    pub main_page: Option<PathBuf>,
}

/*-------------------------------------------------------------------------------------------------
  Export Pipeline
-------------------------------------------------------------------------------------------------*/

/// Fetch, reorganize and export the selected sources, then write the index page.
///
/// The first error aborts the run. Each source is fetched before any of its files are written,
/// so a failed request leaves no file behind for that source.
pub fn run(client: &Client, options: &ExportOptions, request_id: Uuid) -> Result<ExportReport> {
    let artifacts_path = options.artifacts_path();
    export::ensure_directory(&artifacts_path)?;

    let mut report = ExportReport::default();

    if options.include_office365 {
        let records = client.fetch_office365(request_id)?;
        report.request_id = Some(request_id);

        let grouped = reorganize::group_ips_by_service_area(&records)?;
        report.written.extend(export::export_grouped(
            &grouped,
            &options.office365_prefix,
            &artifacts_path,
        )?);
        report.office365_ips = Some(grouped);

        if let Some(filename) = &options.office365_urls_file {
            let urls = reorganize::flatten_urls(&records);
            report
                .written
                .push(export::export_flat_list(&urls, filename, &artifacts_path)?);
            report.office365_urls = Some(urls);
        }
    }

    if options.include_azure {
        let payload = client.fetch_azure_ranges()?;
        let grouped = reorganize::azure_region_groups(&payload)?;
        report.written.extend(export::export_grouped(
            &grouped,
            &options.azure_prefix,
            &artifacts_path,
        )?);
        report.azure_ranges = Some(grouped);
    }

    let main_page = options.main_page_path();
    index_page::write(&artifacts_path, &main_page, &Local::now())?;
    report.main_page = Some(main_page);

    info!("Export wrote {} file(s)", report.written.len());
    Ok(report)
}

/// Upload the artifacts directory and the index page.
pub fn publish<S: BlobStore>(publisher: &Publisher<S>, options: &ExportOptions) -> Result<Vec<String>> {
    let mut uploaded = publisher.upload_dir(&options.artifacts_path(), "")?;
    uploaded.push(publisher.upload_file(&options.main_page_path(), &options.main_page_name)?);
    Ok(uploaded)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
