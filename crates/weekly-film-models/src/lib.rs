pub mod display;
pub mod film;

pub use display::{DisplayFilm, ReleaseDate};
pub use film::FilmRecord;
