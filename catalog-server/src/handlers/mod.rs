pub mod games;
pub mod movies;
pub mod reference;
pub mod series;
