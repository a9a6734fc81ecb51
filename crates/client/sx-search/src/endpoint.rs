//! Endpoint resolution.

use sx_error::{Result, SxError};
use sx_types::Region;
use url::Url;

/// Base address of the search API for a region.
///
/// `prod` resolves to `https://api.sumologic.com`, every other region to
/// `https://api.<region>.sumologic.com`.
pub fn base_url(region: Region) -> Result<Url> {
    let raw = format!("https://api{}.sumologic.com", region.host_segment());
    Url::parse(&raw).map_err(|e| SxError::Config(format!("Invalid API base URL '{raw}': {e}")))
}

/// Base address for a region, honouring an explicit override.
///
/// The override (a proxy or a local mock of the API) wins over the region
/// when set.
pub fn resolve_base_url(region: Region, override_url: Option<&str>) -> Result<Url> {
    match override_url {
        Some(raw) => Url::parse(raw)
            .map_err(|e| SxError::Config(format!("Invalid API base URL '{raw}': {e}"))),
        None => base_url(region),
    }
}
