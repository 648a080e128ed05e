use crate::core::errors::{Error, Result};
use crate::core::json::EndpointRecord;
use serde_json::Value;
use std::collections::HashMap;

/*-------------------------------------------------------------------------------------------------
  Grouped Endpoints
-------------------------------------------------------------------------------------------------*/

/// IP ranges accumulated per group name (an Office 365 service area or an Azure region).
///
/// Groups keep the order in which their names were first seen; ranges within a group keep the
/// order in which they were appended. Duplicate ranges are preserved.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GroupedEndpoints {
    groups: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl GroupedEndpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `ranges` to the group `name`, creating the group on first use.
    pub fn extend<I>(&mut self, name: &str, ranges: I)
    where
        I: IntoIterator<Item = String>,
    {
        let position = match self.index.get(name) {
            Some(position) => *position,
            None => {
                self.groups.push((name.to_string(), Vec::new()));
                self.index.insert(name.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[position].1.extend(ranges);
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.index
            .get(name)
            .map(|position| self.groups[*position].1.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(name, ranges)| (name.as_str(), ranges.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of ranges across all groups.
    pub fn range_count(&self) -> usize {
        self.groups.iter().map(|(_, ranges)| ranges.len()).sum()
    }
}

/*-------------------------------------------------------------------------------------------------
  Office 365
-------------------------------------------------------------------------------------------------*/

/// Group the IP ranges of each record under its service area display name. Records without IP
/// ranges are skipped; a record with IP ranges but no display name is an `UnexpectedShape` error.
pub fn group_ips_by_service_area(records: &[EndpointRecord]) -> Result<GroupedEndpoints> {
    let mut grouped = GroupedEndpoints::new();
    for record in records {
        let ips = match record.ips.as_deref() {
            Some(ips) if !ips.is_empty() => ips,
            _ => continue,
        };
        let name = record.service_area_display_name.as_deref().ok_or_else(|| {
            Error::UnexpectedShape(format!(
                "Office 365 endpoint record {} has IP ranges but no serviceAreaDisplayName",
                record.id.map_or_else(|| "without an id".to_string(), |id| id.to_string())
            ))
        })?;
        grouped.extend(name, ips.iter().cloned());
    }
    Ok(grouped)
}

/// Concatenate the URL lists of all records, in record order.
pub fn flatten_urls(records: &[EndpointRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.urls.as_deref())
        .flatten()
        .cloned()
        .collect()
}

/*-------------------------------------------------------------------------------------------------
  Azure
-------------------------------------------------------------------------------------------------*/

/// View the Azure datacenter IP ranges payload as one group per top-level key.
///
/// Array values contribute one line per element (strings verbatim, anything else as compact
/// JSON); any other value contributes a single line. The payload must be a JSON object.
pub fn azure_region_groups(payload: &Value) -> Result<GroupedEndpoints> {
    let regions = payload.as_object().ok_or_else(|| {
        Error::UnexpectedShape(format!(
            "expected the Azure datacenter IP ranges to be a JSON object, found {}",
            json_type_name(payload)
        ))
    })?;

    let mut grouped = GroupedEndpoints::new();
    for (region, ranges) in regions {
        match ranges {
            Value::Array(items) => grouped.extend(region, items.iter().map(to_line)),
            other => grouped.extend(region, [to_line(other)]),
        }
    }
    Ok(grouped)
}

fn to_line(value: &Value) -> String {
    match value {
        Value::String(string) => string.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
