use cloudendpoints::ExportReport;
use log::{info, warn};

/*-------------------------------------------------------------------------------------------------
  Logging Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Export Report
--------------------------------------------------------------------------------------*/

pub fn export_report(report: &ExportReport) {
    if let Some(request_id) = report.request_id {
        info!("Office 365 client request id: {request_id}");
    }

    if let Some(groups) = &report.office365_ips {
        let count_service_areas = groups.len();
        let count_ranges = groups.range_count();
        info!("Exported {count_ranges} Office 365 IP range(s) in {count_service_areas} service area(s)");
        if groups.is_empty() {
            warn!("No Office 365 endpoint record carried IP ranges");
        }
    }

    if let Some(urls) = &report.office365_urls {
        info!("Exported {} Office 365 URL(s)", urls.len());
    }

    if let Some(groups) = &report.azure_ranges {
        let count_regions = groups.len();
        let count_ranges = groups.range_count();
        info!("Exported {count_ranges} Azure IP range(s) in {count_regions} region(s)");
    }

    if let Some(main_page) = &report.main_page {
        info!("Index page: {:?}", main_page);
    }
}
