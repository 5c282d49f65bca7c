pub mod class_update_service;

pub use class_update_service::{ClassSnapshot, ClassUpdatePlan, ClassUpdateService};
