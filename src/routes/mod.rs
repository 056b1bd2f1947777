mod envelope;
mod health_check;
mod helpers;
mod send;
mod subscribe;

pub use envelope::*;
pub use health_check::*;
pub use helpers::*;
pub use send::*;
pub use subscribe::*;
