//! Automap: runtime type-to-type conversion registry
//!
//! Register conversion functions between concrete types, then convert single
//! values or whole sequences by naming only the source and destination
//! types. The mapper picks the conversion from the type pair at call time.
//!
//! ```
//! use rhi_automap::{MapError, Mapper};
//!
//! let mapper = Mapper::new().configure(|m: &mut Mapper| {
//!     m.add_mapper(|n: i32| {
//!         if n < 0 {
//!             Err(format!("negative value not allowed: {}", n))
//!         } else {
//!             Ok(format!("value-{}", n))
//!         }
//!     })
//! })?;
//!
//! let mut outs: Vec<String> = Vec::new();
//! mapper.map_list([1, 2, 3], &mut outs)?;
//! assert_eq!(outs, ["value-1", "value-2", "value-3"]);
//!
//! let err = mapper.map_list([1, -2, 3], &mut outs).unwrap_err();
//! assert_eq!(err.to_string(), "negative value not allowed: -2");
//! assert_eq!(outs.len(), 3);
//! # Ok::<(), MapError>(())
//! ```

mod bulk;
mod config;
mod conversion;
mod error;
mod key;
mod mapper;
mod registry;

pub use config::{DEFAULT_MIN_PARALLEL_LEN, MapperConfig, ParallelConfig};
pub use conversion::{AnyValue, ConversionEntry};
pub use error::{BoxError, MapError};
pub use key::TypeKey;
pub use mapper::{Mapper, Profile};
pub use registry::Registry;
