pub mod languages;
pub mod strategies;

pub use languages::{language_name, Language, SOURCE_LANGUAGES, TARGET_LANGUAGES};
pub use strategies::Strategy;
