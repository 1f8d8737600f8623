//! CSV export of the failed-build report.

use fm_buildbot::FailedBuild;

use crate::prelude::*;

/// Header row. Same column order as the HTML tables, with the branch first
/// since the CSV is flat.
pub const CSV_HEADER: [&str; 6] = ["Branch", "Builder", "Build", "Commit", "Status", "URL"];

/// Renders one UTF-8 CSV row per record after the header.
pub fn render_csv(records: &[FailedBuild]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([
            record.branch.as_str(),
            record.builder.as_str(),
            record.number.to_string().as_str(),
            record.revision.as_str(),
            record.status.as_str(),
            record.url.as_str(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|err| Error::Render(err.to_string()))
}
