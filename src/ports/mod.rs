//! Port traits. API boundaries for the hexagon.
//!
//! - Inbound: Called by the scheduler into the application
//! - Outbound: Called by application into infrastructure
//! - Credentials: How platform access tokens are obtained and kept

pub mod credentials;
pub mod inbound;
pub mod outbound;

pub use credentials::{AccessTokenProvider, OAuthToken, TokenStorePort, VerifierPort};
pub use inbound::ScheduledJob;
pub use outbound::{
    AuditLogPort, NewsQuery, NewsSearchPort, SafeSearch, SocialPort, TextGenerationPort,
    TimeWindow,
};
