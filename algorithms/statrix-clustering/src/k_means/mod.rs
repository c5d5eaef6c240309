mod algorithm;
mod errors;
mod hyperparams;
mod init;
mod naive;

pub use algorithm::*;
pub use errors::*;
pub use hyperparams::*;
pub use init::*;
pub use naive::*;
