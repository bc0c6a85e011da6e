// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module defines the parameters of a resolution.

use derive_builder::Builder;

use crate::{budget_in_minor_units, DEFAULT_SCALE_FACTOR};

/// The budget that is invested by default
pub const DEFAULT_MAX_BUDGET: f64 = 500.0;
/// By default, one may buy each action at most once
pub const DEFAULT_PURCHASE_LIMIT: usize = 1;

/// This is how you tell a solver how much money it may spend, and how many
/// units of a single action it may buy.
///
/// All solvers account for money in whole minor units: there are `scale`
/// minor units in one currency unit. The budget is rounded down to a whole
/// number of minor units and the cost of each action is rounded up.
///
/// # Example
/// ```
/// # use profit_optimizer::*;
/// let config = SolverConfigBuilder::default()
///     .max_budget(20.0)
///     .purchase_limit(2)
///     .build()
///     .unwrap();
/// assert_eq!(20.0, config.max_budget);
///
/// // the builder rejects meaningless configurations
/// assert!(SolverConfigBuilder::default().purchase_limit(0).build().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct SolverConfig {
    /// The maximum amount of money that can be spent
    #[builder(default = "DEFAULT_MAX_BUDGET")]
    pub max_budget: f64,
    /// The maximum number of units of one single action that can be bought
    #[builder(default = "DEFAULT_PURCHASE_LIMIT")]
    pub purchase_limit: usize,
    /// The number of minor units in one currency unit
    #[builder(default = "DEFAULT_SCALE_FACTOR")]
    pub scale: u32,
}

impl SolverConfig {
    pub fn new(max_budget: f64, purchase_limit: usize) -> Self {
        SolverConfig { max_budget, purchase_limit, scale: DEFAULT_SCALE_FACTOR }
    }
    /// Sets the number of minor units in one currency unit
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }
    /// Checks that a search can be carried out with this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_budget.is_finite() {
            return Err(ConfigError::NonFiniteBudget);
        }
        if self.max_budget < 0.0 {
            return Err(ConfigError::NegativeBudget(self.max_budget));
        }
        if self.purchase_limit < 1 {
            return Err(ConfigError::ZeroPurchaseLimit);
        }
        if self.scale == 0 {
            return Err(ConfigError::InvalidScale);
        }
        self.budget_units().map(|_| ())
    }
    /// The budget, expressed in whole minor units
    pub fn budget_units(&self) -> Result<u64, ConfigError> {
        if self.scale == 0 {
            return Err(ConfigError::InvalidScale);
        }
        budget_in_minor_units(self.max_budget, self.scale)
            .ok_or(ConfigError::BudgetTooLarge(self.max_budget))
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig::new(DEFAULT_MAX_BUDGET, DEFAULT_PURCHASE_LIMIT)
    }
}

impl SolverConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let config = SolverConfig {
            max_budget    : self.max_budget.unwrap_or(DEFAULT_MAX_BUDGET),
            purchase_limit: self.purchase_limit.unwrap_or(DEFAULT_PURCHASE_LIMIT),
            scale         : self.scale.unwrap_or(DEFAULT_SCALE_FACTOR),
        };
        config.validate().map_err(|e| e.to_string())
    }
}

/// The configuration errors that make a solver refuse to start a search.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// One needs to be allowed at least one unit of each action
    #[error("the purchase limit must be at least 1")]
    ZeroPurchaseLimit,
    /// The budget cannot be negative
    #[error("the budget must not be negative (got {0})")]
    NegativeBudget(f64),
    /// The budget must be an actual number
    #[error("the budget must be a finite number")]
    NonFiniteBudget,
    /// There must be at least one minor unit in a currency unit
    #[error("the scale factor must be positive")]
    InvalidScale,
    /// The budget holds too many minor units to be handled
    #[error("the budget is too large (got {0})")]
    BudgetTooLarge(f64),
}
