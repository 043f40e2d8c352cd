pub mod dates;
pub mod trip;
