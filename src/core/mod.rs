/*-------------------------------------------------------------------------------------------------
  Core Modules
-------------------------------------------------------------------------------------------------*/

pub mod cache;
pub mod classifier;
pub mod client;
pub mod errors;
pub mod lookup_result;
pub mod report;
pub mod resolver;
