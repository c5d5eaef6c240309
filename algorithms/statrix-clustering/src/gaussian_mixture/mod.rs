mod algorithm;
mod em_fit;
mod errors;
mod gaussian;
mod hyperparams;
mod init;

pub use algorithm::*;
pub use em_fit::*;
pub use errors::*;
pub use gaussian::Gaussian;
pub use hyperparams::*;
pub use init::*;
