//! Whole-document scenarios over real analyzer output.

mod coreference;
mod discourse;
mod pas;
mod round_trip;
