mod evaluate;
mod weights;

pub use evaluate::run_evaluate;
pub use weights::run_weights;
