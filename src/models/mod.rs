pub mod user;
pub mod commit;
pub mod analysis;
pub mod roast;

pub use user::*;
pub use commit::*;
pub use analysis::*;
pub use roast::*;
