/*-------------------------------------------------------------------------------------------------
  Core Modules
-------------------------------------------------------------------------------------------------*/

pub mod blob;
pub mod client;
pub mod errors;
pub mod export;
pub mod index_page;
pub mod json;
pub mod pipeline;
pub mod reorganize;
pub mod utils;
