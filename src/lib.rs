//! Retrieve the published Office 365 endpoint and Azure datacenter IP range lists, reorganize
//! them into one plain-text file per service area or region, and publish the files with an HTML
//! index page to a blob container.
//!
//! ```no_run
//! use cloudendpoints::{flatten_urls, group_ips_by_service_area, Client};
//!
//! let client = Client::new();
//! let records = client.fetch_office365(cloudendpoints::uuid::Uuid::new_v4())?;
//!
//! for (service_area, ranges) in group_ips_by_service_area(&records)?.iter() {
//!     println!("{service_area}: {} range(s)", ranges.len());
//! }
//! println!("{} URL(s)", flatten_urls(&records).len());
//! # Ok::<(), cloudendpoints::Error>(())
//! ```

mod core;

/*-------------------------------------------------------------------------------------------------
  Library Interface
-------------------------------------------------------------------------------------------------*/

pub use crate::core::blob::{AzureContainer, BlobStore, LocalContainer, Publisher};
pub use crate::core::client::{Client, ClientBuilder, AZURE_DCIP_RANGES_URL, OFFICE365_ENDPOINTS_URL};
pub use crate::core::errors::{Error, Result};
pub use crate::core::export::{ensure_directory, export_flat_list, export_grouped};
pub use crate::core::index_page;
pub use crate::core::json::EndpointRecord;
pub use crate::core::pipeline::{publish, run, ExportOptions, ExportReport};
pub use crate::core::reorganize::{
    azure_region_groups, flatten_urls, group_ips_by_service_area, GroupedEndpoints,
};
pub use crate::core::utils::join_blob_name;

// Re-export crates used in the public interface
pub use uuid;
