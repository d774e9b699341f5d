//! Configuration module

mod site;

pub use site::BookConfig;
pub use site::HeadersConfig;
pub use site::LastModifiedConfig;
pub use site::LinkClassConfig;
pub use site::OpenFileConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
