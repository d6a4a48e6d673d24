use geolocate::{LookupResult, Result};
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Save Lookup Results to CSV File
-------------------------------------------------------------------------------------------------*/

pub fn save(results: &[LookupResult], path: &PathBuf) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    // Write header
    writer.serialize([
        "IP",
        "ISP",
        "Org",
        "Hostname",
        "City",
        "Country Code",
        "Country Name",
        "Success",
        "Classification",
        "Error",
    ])?;

    // Write result records
    for result in results {
        let record = (
            &result.address,
            &result.isp,
            &result.org,
            &result.hostname,
            &result.city,
            &result.country_code,
            &result.country_name,
            result.success,
            result.classification.as_str(),
            &result.error,
        );
        writer.serialize(record)?;
    }

    writer.flush()?;

    Ok(())
}
