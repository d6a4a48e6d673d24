use crate::core::lookup_result::LookupResult;
use log::{debug, error, info};

/*-------------------------------------------------------------------------------------------------
  Reporter
-------------------------------------------------------------------------------------------------*/

/// Receives every finished lookup exactly once, whatever state the lookup ended in.
pub trait Reporter: Send + Sync {
    fn report(&self, result: &LookupResult);
}

/*-------------------------------------------------------------------------------------------------
  Log Reporter
-------------------------------------------------------------------------------------------------*/

/// Default [Reporter]: a one-line summary at `debug` and the full record as JSON at `info`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, result: &LookupResult) {
        debug!(
            "{{IP:{}, CC:{}, Class:{}}}",
            result.address, result.country_code, result.classification
        );

        let _ = serde_json::to_string(result)
            .inspect(|json| info!("{json}"))
            .inspect_err(|error| error!("Failed to serialize lookup result for log: {error}"));
    }
}
