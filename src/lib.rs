mod channel;
mod client;
mod config;
mod error;
mod fetcher;
mod methods;
mod object;
mod resolution;
#[cfg(feature = "stats")]
mod resolve_stats;
mod resolver;
mod transport;
mod user;

pub use channel::{Channel, ChannelMethods};
pub use client::WebClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_MEMBER_CONCURRENCY};
pub use error::{Error, Result, SlackError};
pub use fetcher::{fetch_fn, FetchFn, Fetcher};
pub use methods::{ApiObject, Arg};
pub use object::SlackObject;
pub use resolver::{resolve_all, BatchResolver, ResolveError};
pub use transport::{HttpTransport, Transport};
pub use user::{User, UserMethods, PICTURE_SIZES};
