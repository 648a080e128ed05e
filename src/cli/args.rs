use clap::{Parser, Subcommand};
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Command Line Interface (CLI) Arguments
-------------------------------------------------------------------------------------------------*/

#[derive(Parser, Debug)]
#[command(author, version, about="Export the Office 365 endpoint and Azure datacenter IP range lists.", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Logging verbosity
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the endpoint lists, write one file per service area / region and the index page
    Export(ExportArgs),

    /// Download a blob or blob directory from the container
    Download(DownloadArgs),

    /// List the blobs under a path in the container
    Ls(ListArgs),
}

/*--------------------------------------------------------------------------------------
  Export
--------------------------------------------------------------------------------------*/

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Directory holding the artifacts directory and the index page [default: the user cache
    /// directory]
    #[arg(short = 'w', long)]
    pub working_path: Option<PathBuf>,

    /// Only export the Office 365 endpoints
    #[arg(long, conflicts_with = "azure_only")]
    pub office365_only: bool,

    /// Only export the Azure datacenter IP ranges
    #[arg(long)]
    pub azure_only: bool,

    /// Also write the flattened Office 365 URL list to this file in the artifacts directory
    #[arg(long = "urls", value_name = "FILE_NAME")]
    pub urls_file: Option<String>,

    /// File name prefix for the Office 365 service area files
    #[arg(long, default_value = "")]
    pub office365_prefix: String,

    /// File name prefix for the Azure region files
    #[arg(long, default_value = "Azure Cloud: region ")]
    pub azure_prefix: String,

    /// Include a summary of the exported ranges
    #[arg(long)]
    pub summary: bool,

    /// Save the Office 365 service area ranges to a CSV file
    #[arg(long = "csv")]
    pub csv_file: Option<PathBuf>,

    #[command(flatten)]
    pub container: ContainerArgs,
}

/*--------------------------------------------------------------------------------------
  Download
--------------------------------------------------------------------------------------*/

#[derive(clap::Args, Debug)]
pub struct DownloadArgs {
    /// Blob name or blob directory to download
    pub source: String,

    /// Local destination file or directory
    pub dest: PathBuf,

    #[command(flatten)]
    pub container: ContainerArgs,
}

/*--------------------------------------------------------------------------------------
  List
--------------------------------------------------------------------------------------*/

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Blob directory to list
    #[arg(default_value = "")]
    pub path: String,

    /// Include blobs in nested directories
    #[arg(short, long)]
    pub recursive: bool,

    #[command(flatten)]
    pub container: ContainerArgs,
}

/*--------------------------------------------------------------------------------------
  Container
--------------------------------------------------------------------------------------*/

#[derive(clap::Args, Debug)]
pub struct ContainerArgs {
    /// Azure blob container SAS URL
    #[arg(long, env = "CLOUDENDPOINTS_CONTAINER_URL", hide_env_values = true)]
    pub container_url: Option<String>,

    /// Local directory used as the blob container
    #[arg(long, conflicts_with = "container_url")]
    pub container_dir: Option<PathBuf>,
}
