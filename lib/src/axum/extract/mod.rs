pub mod payload;
pub mod session;

pub use payload::Payload;
pub use session::{Session, TokenQuery};
