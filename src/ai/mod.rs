pub mod candidates;
pub mod evaluation;
pub mod strategies;
pub mod service;
pub mod local_service;
pub mod mock_service;

pub use candidates::*;
pub use evaluation::*;
pub use strategies::*;
pub use service::*;
pub use local_service::*;
pub use mock_service::*;
