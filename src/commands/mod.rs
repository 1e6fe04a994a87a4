pub mod remediate;

pub use remediate::remediate;
