//! The stock town: seven locations wired into one registry.

mod alley;
mod bank;
mod church;
mod home;
mod inn;
mod prison;
mod street;

pub use alley::DarkAlley;
pub use bank::Bank;
pub use church::Church;
pub use home::Home;
pub use inn::Inn;
pub use prison::Prison;
pub use street::MainStreet;

use crate::registry::{ConfigError, LocationRegistry};

/// Bail owed per remaining day of a prison sentence.
pub const BAIL_PER_DAY: u64 = 50;

/// Register every town location.
pub fn standard_registry() -> Result<LocationRegistry, ConfigError> {
    LocationRegistry::builder()
        .register(MainStreet::new())
        .register(Inn::new())
        .register(Bank::new())
        .register(Church::new())
        .register(DarkAlley::new())
        .register(Prison::new())
        .register(Home::new())
        .build()
}
