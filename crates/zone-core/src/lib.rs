pub mod constants;
pub mod error;
pub mod fade;
pub mod intensity;
pub mod proximity;
pub mod registry;
pub mod session;
pub mod timeline;
pub mod zones;

pub use constants::*;
pub use error::*;
pub use fade::*;
pub use intensity::*;
pub use proximity::*;
pub use registry::*;
pub use session::*;
pub use timeline::*;
pub use zones::*;
