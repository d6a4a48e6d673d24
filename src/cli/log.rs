use geolocate::{Classification, LookupResult};
use log::{info, warn};

/*-------------------------------------------------------------------------------------------------
  Logging Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Lookup Summary
--------------------------------------------------------------------------------------*/

pub fn summary(results: &[LookupResult]) {
    let count = |classification: Classification| {
        results
            .iter()
            .filter(|result| result.classification == classification)
            .count()
    };

    info!("Looked up {} address(es)", results.len());
    info!(
        "{} local, {} non-routable, {} cache hit(s), {} cache miss(es)",
        count(Classification::Local),
        count(Classification::NonRoutable),
        count(Classification::CacheHit),
        count(Classification::CacheMiss),
    );

    let failed = results
        .iter()
        .filter(|result| result.classification == Classification::CacheMiss && !result.success)
        .count();
    if failed > 0 {
        warn!("Could not resolve {failed} address(es)");
    };
}
