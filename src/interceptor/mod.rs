//! Interceptor Module
//!
//! Cache-aside wiring between business operations and a cache.
//!
//! | Operation      | Cache calls                                              |
//! |----------------|----------------------------------------------------------|
//! | read by id     | `get_by_id`; on a miss run the operation, then `save`    |
//! | create, update | run the operation, then `save`                           |
//! | delete by id   | run the operation, then `delete`                         |

mod cache_aside;
mod registry;

pub use cache_aside::CacheInterceptor;
pub use registry::{json_field_extractor, IdExtractor, IdExtractorRegistry};
