pub mod keywords;
pub mod models;
pub mod normalize;
pub mod resolver;
pub mod responses;

pub use keywords::KeywordSets;
pub use models::*;
pub use normalize::normalize;
pub use resolver::{ResolveParams, Resolver};
pub use responses::ResponseBank;
