pub mod column_resolver;
pub mod csv_permuter;
pub mod permutation_engine;
