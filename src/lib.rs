mod aggregate;
mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
mod render;
mod utils;

#[cfg(test)]
mod test;

pub use aggregate::{
    compute_category_breakdown, compute_category_totals, compute_monthly_totals,
    compute_totals, CategoryTotals, MonthTotals, MonthlyTotals, Summary, Totals,
};
pub use api::{store, Mode, Store};
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use render::RenderContext;
