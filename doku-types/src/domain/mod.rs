//! Domain values shared by both clients.

mod amount;
mod credentials;
mod environment;

pub use amount::format_amount;
pub use credentials::Credentials;
pub use environment::Environment;
