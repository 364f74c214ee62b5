pub mod hypergeometric;

pub use hypergeometric::{
    at_least, at_most, between, distribution, exactly, expected_successes, DomainError,
    Hypergeometric,
};
