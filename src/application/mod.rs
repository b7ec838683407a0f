// Application layer - Query, transform and export use cases
pub mod export;
pub mod report_service;
pub mod revenue_queries;
pub mod transform;
pub mod warehouse;

#[cfg(test)]
pub mod test_support;
