//! Domain model (factors, instances, trends, errors).

pub mod errors;
pub mod factors;
pub mod instance;
pub mod trend;

pub use self::errors::{ActionError, TropismError};
pub use self::factors::{FactorMap, snapshot};
pub use self::instance::Instance;
pub use self::trend::{NORMAL_BAND, Trend, TrendMap};
