//! The draw contract and the recorder that bakes it into frame records.

pub mod contract;
pub mod recorder;
