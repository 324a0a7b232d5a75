mod beer_list;
mod home;
mod spinner;

pub use beer_list::BeerList;
pub use home::Home;
pub use spinner::LoadingSpinner;
