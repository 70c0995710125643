mod errors;
mod monetary;

pub use errors::MonetaryError;
pub use monetary::Monetary;

pub type ClientId = u16;
pub type TransactionId = String;
