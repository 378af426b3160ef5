//! Monthly aggregation and the read-only views derived from it.
//!
//! Every function here is a pure function of the transaction set and the
//! display order; callers rebuild the aggregate for each query.

mod monthly;
mod views;

pub(crate) use monthly::MonthlyAggregate;
pub(crate) use views::*;
