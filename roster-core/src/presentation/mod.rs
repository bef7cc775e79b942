pub mod request;
pub mod response;

pub use request::{OptimizeRequest, PolicyOverride, RecommendRequest, ReoptimizeRequest};
pub use response::{NurseMeta, OptimizeResponse, PlanPayload, PlanSummary, RecommendResponse};
