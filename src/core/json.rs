use crate::core::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/*-------------------------------------------------------------------------------------------------
  Parse JSON
-------------------------------------------------------------------------------------------------*/

/// Parse the Office 365 worldwide endpoints JSON array.
pub fn parse_office365(json: &str) -> Result<Vec<EndpointRecord>> {
    serde_json::from_str(json).map_err(|source| Error::Parse {
        context: "Office 365 endpoints".to_string(),
        source,
    })
}

/// Parse the Azure datacenter IP ranges JSON; the payload is kept as-is.
pub fn parse_azure(json: &str) -> Result<serde_json::Value> {
    serde_json::from_str(json).map_err(|source| Error::Parse {
        context: "Azure datacenter IP ranges".to_string(),
        source,
    })
}

/*-------------------------------------------------------------------------------------------------
  JSON Data Structures
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Endpoint Record
--------------------------------------------------------------------------------------*/

/// One entry of the Office 365 endpoints response. Only the service area display name, IP ranges
/// and URLs are used when reorganizing; the remaining fields are kept for completeness.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_area: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_area_display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ips: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_ports: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_ports: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub express_route: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    const SAMPLE: &str = r#"[
        {
            "id": 1,
            "serviceArea": "Exchange",
            "serviceAreaDisplayName": "Exchange Online",
            "urls": ["outlook.office.com", "outlook.office365.com"],
            "ips": ["13.107.6.152/31", "2603:1006::/40"],
            "tcpPorts": "80,443",
            "expressRoute": true,
            "category": "Optimize",
            "required": true
        },
        {
            "id": 2,
            "serviceArea": "Skype",
            "serviceAreaDisplayName": "Skype for Business Online and Microsoft Teams",
            "urls": ["*.lync.com"],
            "udpPorts": "3478,3479,3480,3481",
            "expressRoute": false,
            "category": "Allow",
            "required": true
        }
    ]"#;

    #[test]
    fn test_parse_office365() {
        let records = parse_office365(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].id, Some(1));
        assert_eq!(
            records[0].service_area_display_name.as_deref(),
            Some("Exchange Online")
        );
        assert_eq!(
            records[0].ips.as_deref(),
            Some(&["13.107.6.152/31".to_string(), "2603:1006::/40".to_string()][..])
        );
        assert_eq!(records[0].tcp_ports.as_deref(), Some("80,443"));

        assert!(records[1].ips.is_none());
        assert_eq!(records[1].udp_ports.as_deref(), Some("3478,3479,3480,3481"));
    }

    #[test]
    fn test_parse_office365_missing_display_name() {
        let records = parse_office365(r#"[{"urls": ["a.com"]}]"#).unwrap();
        assert!(records[0].service_area_display_name.is_none());
        assert_eq!(records[0].urls, Some(vec!["a.com".to_string()]));
    }

    #[test]
    fn test_parse_office365_invalid_json() {
        let result = parse_office365("<html>Service Unavailable</html>");
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_parse_office365_not_an_array() {
        let result = parse_office365(r#"{"error": "bad clientrequestid"}"#);
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_parse_azure_keeps_payload() {
        let json = r#"{"westeurope": ["13.69.0.0/17"], "other": {"nested": 1}}"#;
        let value = parse_azure(json).unwrap();
        assert_eq!(value, serde_json::from_str::<serde_json::Value>(json).unwrap());
    }
}
