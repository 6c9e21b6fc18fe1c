//! Aggregation and normalization of gateway responses into view-models.

pub mod champions;
pub mod cycle;
pub mod fanout;
pub mod matches;
pub mod normalize;

#[cfg(test)]
pub(crate) mod test_support;
