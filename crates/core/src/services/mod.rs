pub mod aggregation_service;
pub mod expense_service;
pub mod projection_service;
pub mod summary_service;
pub mod validation_service;
