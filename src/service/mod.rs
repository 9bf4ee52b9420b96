pub mod preloader;

pub use preloader::{PreloadPlan, SessionOutcome, SessionReport, preload, preload_with};
