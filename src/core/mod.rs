/*-------------------------------------------------------------------------------------------------
  Core Modules
-------------------------------------------------------------------------------------------------*/

pub mod config;
pub mod datetime;
pub mod errors;
pub mod feed;
pub mod filter;
pub mod integrity;
pub mod ipset;
pub mod json;
pub mod lifecycle;
pub mod logging;
pub mod notification;
pub mod pipeline;
pub mod seed;
pub mod waf;
