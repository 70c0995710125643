mod errors;
mod oracle;
#[cfg(test)]
mod tests;

pub use errors::VerificationError;
pub use oracle::verify_files;
