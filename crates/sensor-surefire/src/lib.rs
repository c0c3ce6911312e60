//! Surefire test report sensor.
//!
//! The sensor runs in four steps:
//!
//! 1. **Locate**: pick `TEST-*.xml` (or, failing that, `TESTS-*.xml`) files
//!    from the reports directory
//! 2. **Parse**: stream every report into its own [`UnitTestIndex`] and fold
//!    it into the run index once the whole file has been read
//! 3. **Sanitize**: fold nested classes (`Outer$Inner`) into their enclosing
//!    class, since measures are attached to files
//! 4. **Save**: resolve each class to a source file and persist its test
//!    measures and the test-data dump
//!
//! [`UnitTestIndex`]: sensor_model::UnitTestIndex

mod dump;
mod error;
mod handler;
mod locator;
mod parser;
mod reconcile;
mod resolver;
mod sensor;

pub use dump::{from_xml, to_xml};
pub use error::{Result, SurefireError};
pub use handler::SurefireStaxHandler;
pub use locator::{TEST_REPORT_PREFIX, TEST_SUITE_REPORT_PREFIX, find_reports};
pub use parser::{CollectOutcome, SurefireParser, parse_report};
pub use reconcile::{SaveSummary, TestMeasures, sanitize, save, scale_value};
pub use resolver::{ClassFileResolver, UnitTestResourceResolver};
pub use sensor::{DEFAULT_REPORT_PATH, REPORT_PATH_KEY, SurefireSensor};
