pub mod banks;
pub mod nbfcs;

pub use banks::{CuratedBanks, TOP_BANKS};
pub use nbfcs::NbfcCsvSource;
