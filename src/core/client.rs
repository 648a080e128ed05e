use crate::core::errors::{Error, Result};
use crate::core::json::{self, EndpointRecord};
use crate::core::utils::get_env_var;
use log::{debug, info};
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

/*-------------------------------------------------------------------------------------------------
  Defaults
-------------------------------------------------------------------------------------------------*/

pub const OFFICE365_ENDPOINTS_URL: &str = "https://endpoints.office.com/endpoints/worldwide";
pub const AZURE_DCIP_RANGES_URL: &str = "https://azuredcip.azurewebsites.net/getazuredcipranges";

/*-------------------------------------------------------------------------------------------------
  Client Builder
-------------------------------------------------------------------------------------------------*/

/// A builder for the [Client] struct that allows you to customize the upstream URLs.
///
/// ```
/// let client = cloudendpoints::ClientBuilder::new()
///     .office365_url("https://endpoints.office.com/endpoints/worldwide")
///     .azure_url("https://azuredcip.azurewebsites.net/getazuredcipranges")
///     .build();
/// ```
///
/// The [ClientBuilder::new] method sources configuration values from environment variables when
/// set and uses default values when the environment variables are not set. Use
/// [ClientBuilder::default] to ignore the environment.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    office365_url: String,
    azure_url: String,
}

/*--------------------------------------------------------------------------------------
  Client Builder Implementation
--------------------------------------------------------------------------------------*/

impl Default for ClientBuilder {
    /// Create a new [ClientBuilder] with the published upstream URLs.
    ///
    /// ```
    /// let client = cloudendpoints::ClientBuilder::default().build();
    ///
    /// assert_eq!(client.office365_url(), "https://endpoints.office.com/endpoints/worldwide");
    /// assert_eq!(client.azure_url(), "https://azuredcip.azurewebsites.net/getazuredcipranges");
    /// ```
    fn default() -> Self {
        Self {
            office365_url: OFFICE365_ENDPOINTS_URL.to_string(),
            azure_url: AZURE_DCIP_RANGES_URL.to_string(),
        }
    }
}

impl ClientBuilder {
    /// Create a new [ClientBuilder] reading initial configuration values from
    /// environment variables when set:
    /// - `CLOUDENDPOINTS_OFFICE365_URL`
    /// - `CLOUDENDPOINTS_AZURE_URL`
    pub fn new() -> Self {
        let default = ClientBuilder::default();

        Self {
            office365_url: get_env_var("CLOUDENDPOINTS_OFFICE365_URL", default.office365_url),
            azure_url: get_env_var("CLOUDENDPOINTS_AZURE_URL", default.azure_url),
        }
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Set the Office 365 worldwide endpoints URL (without query string).
    pub fn office365_url(&mut self, url: &str) -> &mut Self {
        self.office365_url = url.to_string();
        self
    }

    /// Set the Azure datacenter IP ranges URL.
    pub fn azure_url(&mut self, url: &str) -> &mut Self {
        self.azure_url = url.to_string();
        self
    }

    /*-------------------------------------------------------------------------
      Build Method
    -------------------------------------------------------------------------*/

    pub fn build(&self) -> Client {
        Client {
            office365_url: self.office365_url.clone(),
            azure_url: self.azure_url.clone(),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Client
-------------------------------------------------------------------------------------------------*/

/// A blocking client for the Office 365 endpoints and Azure datacenter IP ranges APIs.
///
/// Each call issues exactly one request; there are no retries and no timeout.
///
/// ```no_run
/// let client = cloudendpoints::Client::new();
/// let records = client.fetch_office365(cloudendpoints::uuid::Uuid::new_v4()).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    office365_url: String,
    azure_url: String,
}

/*--------------------------------------------------------------------------------------
  Client Implementation
--------------------------------------------------------------------------------------*/

impl Default for Client {
    fn default() -> Self {
        ClientBuilder::default().build()
    }
}

impl Client {
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    pub fn office365_url(&self) -> &str {
        &self.office365_url
    }

    pub fn azure_url(&self) -> &str {
        &self.azure_url
    }

    /*-------------------------------------------------------------------------
      Fetch Methods
    -------------------------------------------------------------------------*/

    /// GET the Office 365 worldwide endpoints, tagging the request with `client_request_id`.
    pub fn fetch_office365(&self, client_request_id: Uuid) -> Result<Vec<EndpointRecord>> {
        let url = format!(
            "{}?clientrequestid={}",
            self.office365_url, client_request_id
        );
        info!("Get Office 365 endpoints: GET {}", url);

        let response = http_client(&url)?
            .get(&self.office365_url)
            .query(&[("clientrequestid", client_request_id.to_string())])
            .send();
        let body = read_body(&url, response)?;

        let records = json::parse_office365(&body)?;
        info!("Received {} Office 365 endpoint records", records.len());
        Ok(records)
    }

    /// POST the all-regions request to the Azure datacenter IP ranges API and return the payload
    /// unmodified.
    pub fn fetch_azure_ranges(&self) -> Result<serde_json::Value> {
        info!("Get Azure datacenter IP ranges: POST {}", self.azure_url);

        let response = http_client(&self.azure_url)?
            .post(&self.azure_url)
            .json(&json!({"request": "dcip", "region": "all"}))
            .send();
        let body = read_body(&self.azure_url, response)?;

        json::parse_azure(&body)
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// Blocking HTTP client without the default request timeout.
pub(crate) fn http_client(url: &str) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(None::<Duration>)
        .build()
        .map_err(|source| Error::Network {
            url: url.to_string(),
            source,
        })
}

/// Check the response status and read the body as text.
pub(crate) fn read_body(
    url: &str,
    response: reqwest::Result<reqwest::blocking::Response>,
) -> Result<String> {
    let network_error = |source| Error::Network {
        url: url.to_string(),
        source,
    };

    let response = response.map_err(network_error)?;
    let status = response.status();
    if !status.is_success() {
        debug!("{} returned {}", url, status);
        return Err(Error::Status {
            url: url.to_string(),
            status,
        });
    }
    response.text().map_err(network_error)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
