//! SeaORM entity definitions.

pub mod run;
pub mod test_case;
