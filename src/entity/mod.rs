pub mod contacts;
pub mod locations;
pub mod payments;
pub mod reviews;
pub mod show_times;

pub use contacts::Entity as Contacts;
pub use locations::Entity as Locations;
pub use payments::Entity as Payments;
pub use reviews::Entity as Reviews;
pub use show_times::Entity as ShowTimes;
