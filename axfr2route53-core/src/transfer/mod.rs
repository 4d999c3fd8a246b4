//! Transfer Fetcher: zone transfer from the source server plus type filtering

mod axfr;
mod records;

pub use axfr::AxfrClient;
pub use records::{filter_records, present_rdata};

pub use hickory_resolver::proto::rr::Record;

