use crate::cli::args::{ContainerArgs, ExportArgs};
use cloudendpoints::{AzureContainer, BlobStore, ExportOptions, LocalContainer, Publisher, Result};
use log::info;
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Core functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Default working path
--------------------------------------------------------------------------------------*/

pub fn default_working_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("cloudendpoints")
}

/*--------------------------------------------------------------------------------------
  Build export options from CLI arguments
--------------------------------------------------------------------------------------*/

pub fn build_export_options(args: &ExportArgs) -> ExportOptions {
    let working_path = args
        .working_path
        .clone()
        .unwrap_or_else(default_working_path);
    info!("Working path: {:?}", working_path);

    ExportOptions {
        office365_prefix: args.office365_prefix.clone(),
        azure_prefix: args.azure_prefix.clone(),
        office365_urls_file: args.urls_file.clone(),
        include_office365: !args.azure_only,
        include_azure: !args.office365_only,
        ..ExportOptions::new(working_path)
    }
}

/*--------------------------------------------------------------------------------------
  Build the blob publisher from CLI arguments
--------------------------------------------------------------------------------------*/

pub fn build_publisher(args: &ContainerArgs) -> Result<Option<Publisher<Box<dyn BlobStore>>>> {
    let store: Box<dyn BlobStore> = match (&args.container_url, &args.container_dir) {
        (_, Some(container_dir)) => {
            info!("Using local container {:?}", container_dir);
            Box::new(LocalContainer::new(container_dir))
        }
        (Some(container_url), None) => {
            let container = AzureContainer::from_sas_url(container_url)?;
            info!("Using Azure container {}", container.url());
            Box::new(container)
        }
        (None, None) => return Ok(None),
    };
    Ok(Some(Publisher::new(store)))
}
