pub mod contract;
pub mod signer;
pub mod template;
