pub mod hall;
pub mod movie;
pub mod person;
pub mod show;
pub mod user;

pub use hall::{CinemaHall, CinemaSeat};
pub use movie::{CarouselImage, Movie, ShowCard, ShowDetail};
pub use person::{CrewMember, Person, PersonMovie};
pub use show::{Show, ShowSeat};
pub use user::{User, UserProfile};
