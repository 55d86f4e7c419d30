mod games;
mod movies;
mod references;
mod series;

pub use games::GameRepository;
pub use movies::MovieRepository;
pub use references::ReferenceRepository;
pub use series::SeriesRepository;
