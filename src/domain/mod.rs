// Domain layer - Revenue rows and the report page model
pub mod error;
pub mod report;
pub mod revenue;
