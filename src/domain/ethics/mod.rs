//! Ethics module - the Ethical Weight Table that prioritises value categories.

mod weight_table;

pub use weight_table::{EthicalWeight, EthicalWeightTable, WeightTableError};
