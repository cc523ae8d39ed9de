//! Data model shared by the API and consumer services

pub mod job;
pub mod request;
pub mod result;

pub use job::Job;
pub use request::{
    AnalysisRequest, Anomaly, AnomalyCount, Category, HostInstanceDbRequest, Instance,
    Performance, ServiceRequest, Summary, Tier, TxCode, TxCodes,
};
pub use result::{ResultRecord, ResultStatus};
