pub mod util;

pub use util::{fingerprint, parse_seeds, report_timestamp, split_csv};
