mod mobdb;

pub use mobdb::MobdbError;
