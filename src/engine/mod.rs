pub mod evaluator;
pub mod reverse_mode;
pub mod scoring;
pub mod selector;
