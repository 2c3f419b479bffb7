use super::{ClassifyError, PointClassifier};
use statetime_core::model::{Coordinate, RegionCode};
use std::time::Duration;

pub const DEFAULT_GEOCODE_TIMEOUT: Duration = Duration::from_secs(5);

/// reverse-geocodes coordinates against a Nominatim-style `/reverse`
/// endpoint, producing `CC:StateName` region codes. each call is blocking
/// with a bounded timeout and no retry: a failed or timed-out call
/// degrades to the unknown sentinel rather than aborting the batch.
pub struct ReverseGeocoder {
    client: reqwest::blocking::Client,
    reverse_url: String,
}

impl ReverseGeocoder {
    pub fn new(base_url: &str, timeout: Duration) -> Result<ReverseGeocoder, ClassifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(ReverseGeocoder {
            client,
            reverse_url: format!("{}/reverse", base_url.trim_end_matches('/')),
        })
    }

    /// one reverse lookup. None covers every failure mode: transport
    /// errors, non-2xx statuses, unparseable bodies, and responses with no
    /// state-level address component.
    fn reverse(&self, coordinate: &Coordinate) -> Option<RegionCode> {
        let response = self
            .client
            .get(&self.reverse_url)
            .query(&[
                ("format", String::from("jsonv2")),
                ("lat", coordinate.lat.to_string()),
                ("lon", coordinate.lon.to_string()),
                ("zoom", String::from("10")),
                ("addressdetails", String::from("1")),
            ])
            .send()
            .ok()?
            .error_for_status()
            .ok()?;
        let body: serde_json::Value = response.json().ok()?;
        let address = body.get("address")?;
        let state = address
            .get("state")
            .or_else(|| address.get("region"))
            .or_else(|| address.get("province"))
            .and_then(|v| v.as_str())?;
        let country = address
            .get("country_code")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_uppercase();
        Some(RegionCode::new(format!("{country}:{state}")))
    }
}

impl PointClassifier for ReverseGeocoder {
    fn classify_point(&self, coordinate: &Coordinate) -> RegionCode {
        match self.reverse(coordinate) {
            Some(region) => region,
            None => {
                log::debug!("reverse geocode failed for {coordinate}, classifying as unknown");
                RegionCode::unknown()
            }
        }
    }
}
