pub mod batch_service;
pub use batch_service::BatchService;
pub mod event_service;
pub use event_service::EventService;
pub mod report_service;
pub use report_service::ReportService;
