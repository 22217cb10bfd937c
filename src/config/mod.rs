//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::LinkConfig;
pub use site::MathConfig;
pub use site::ProjectConfig;
pub use site::SearchConfig;
pub use site::SiteConfig;
