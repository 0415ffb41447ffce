//! SeaORM entities.

pub mod token_record;
