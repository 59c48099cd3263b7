//! X (Twitter) adapter: OAuth 1.0a signing, token providers, post publisher.

pub mod credentials;
pub mod oauth1;
pub mod publisher;

pub use credentials::{PinFlowProvider, StaticTokenProvider};
pub use oauth1::{OAuth1Signer, PinFlow};
pub use publisher::XPublisher;
