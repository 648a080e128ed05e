use cloudendpoints::{ExportReport, GroupedEndpoints};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::*;
use ipnetwork::IpNetwork;
use log::warn;

/*-------------------------------------------------------------------------------------------------
  Output Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Summary Table
--------------------------------------------------------------------------------------*/

pub fn summary_table(report: &ExportReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(
        ["Source", "Service Area / Region", "IPv4", "IPv6", "Other"]
            .into_iter()
            .map(|header| {
                Cell::new(header)
                    .add_attribute(Attribute::Bold)
                    .fg(Color::Green)
            }),
    );

    let sources = [
        ("Office 365", report.office365_ips.as_ref()),
        ("Azure", report.azure_ranges.as_ref()),
    ];
    for (source, groups) in sources {
        let Some(groups) = groups else { continue };
        for (name, ranges) in groups.iter() {
            let counts = PrefixCounts::from_ranges(ranges);
            table.add_row(vec![
                Cell::new(source),
                Cell::new(name).add_attribute(Attribute::Bold),
                Cell::new(counts.ipv4),
                Cell::new(counts.ipv6),
                Cell::new(counts.other),
            ]);
        }
    }

    // Right-align the count columns
    for index in 2..=4 {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    println!("{table}");

    // Print totals
    let mut summary_table = Table::new();
    summary_table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let group_total = |groups: Option<&GroupedEndpoints>| groups.map_or(0, GroupedEndpoints::len);
    let range_total =
        |groups: Option<&GroupedEndpoints>| groups.map_or(0, GroupedEndpoints::range_count);

    summary_table.add_row(vec![
        Cell::new(group_total(report.office365_ips.as_ref())),
        Cell::new("Office 365 Service Areas"),
    ]);
    summary_table.add_row(vec![
        Cell::new(range_total(report.office365_ips.as_ref())),
        Cell::new("Office 365 IP Ranges"),
    ]);
    if let Some(urls) = &report.office365_urls {
        summary_table.add_row(vec![Cell::new(urls.len()), Cell::new("Office 365 URLs")]);
    }
    summary_table.add_row(vec![
        Cell::new(group_total(report.azure_ranges.as_ref())),
        Cell::new("Azure Regions"),
    ]);
    summary_table.add_row(vec![
        Cell::new(range_total(report.azure_ranges.as_ref())),
        Cell::new("Azure IP Ranges"),
    ]);
    summary_table.add_row(vec![
        Cell::new(report.written.len()),
        Cell::new("Files Written"),
    ]);

    if let Some(column) = summary_table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    println!("{summary_table}");
}

/*--------------------------------------------------------------------------------------
  Blob Names
--------------------------------------------------------------------------------------*/

pub fn blob_names(names: &[String]) {
    for name in names {
        println!("{name}");
    }
}

/*--------------------------------------------------------------------------------------
  Prefix Counts
--------------------------------------------------------------------------------------*/

#[derive(Debug, Default, Eq, PartialEq)]
struct PrefixCounts {
    ipv4: usize,
    ipv6: usize,
    other: usize,
}

impl PrefixCounts {
    fn from_ranges(ranges: &[String]) -> Self {
        let mut counts = Self::default();
        for range in ranges {
            match range.parse::<IpNetwork>() {
                Ok(IpNetwork::V4(_)) => counts.ipv4 += 1,
                Ok(IpNetwork::V6(_)) => counts.ipv6 += 1,
                Err(_) => {
                    warn!("Not an IP prefix: {:?}", range);
                    counts.other += 1
                }
            }
        }
        counts
    }
}
