//! NEAR blockchain access: JSON-RPC plumbing and the on-chain supply reader

pub mod rpc;
pub mod supply;

pub use rpc::NearRpcClient;
pub use supply::{ SupplyData, SupplyReader };
