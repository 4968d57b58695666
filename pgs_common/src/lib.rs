mod baht;
pub mod helpers;
mod secret;

pub use baht::{Baht, BahtConversionError, THB_CURRENCY_CODE};
pub use secret::Secret;
