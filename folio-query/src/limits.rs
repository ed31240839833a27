//! Query limits resolved from settings and the host environment.

use tracing::{debug, warn};

use crate::error::{QueryError, Result};
use crate::settings::{HostEnvironment, QuerySettings, ResultCountMode};

/// Cost of one field when no `field-impact` is configured.
pub const DEFAULT_FIELD_IMPACT: f64 = 2.0;

const GENERIC_ERROR_MESSAGE: &str = "an error occurred while resolving the query";

/// Settings bound to an environment, ready to validate queries.
#[derive(Debug, Clone)]
pub struct QueryLimits {
    settings: QuerySettings,
    environment: HostEnvironment,
    result_count_mode: ResultCountMode,
    expose_exceptions: bool,
}

impl QueryLimits {
    pub fn new(settings: QuerySettings, environment: HostEnvironment) -> Self {
        let result_count_mode = settings
            .max_number_of_results_validation_mode
            .resolve(environment);
        let expose_exceptions = settings
            .expose_exceptions
            .unwrap_or_else(|| environment.is_development());
        debug!(
            %environment,
            ?result_count_mode,
            expose_exceptions,
            "resolved query limits"
        );
        Self {
            settings,
            environment,
            result_count_mode,
            expose_exceptions,
        }
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    pub fn environment(&self) -> HostEnvironment {
        self.environment
    }

    /// The effective mode; never [`ResultCountMode::Default`].
    pub fn result_count_mode(&self) -> ResultCountMode {
        self.result_count_mode
    }

    pub fn exposes_exceptions(&self) -> bool {
        self.expose_exceptions
    }

    pub fn field_impact(&self) -> f64 {
        self.settings.field_impact.unwrap_or(DEFAULT_FIELD_IMPACT)
    }

    pub fn check_depth(&self, depth: usize) -> Result<()> {
        let max = self.settings.max_depth;
        if depth > max {
            return Err(QueryError::DepthExceeded { depth, max });
        }
        Ok(())
    }

    /// Computes the cost of selecting `field_count` fields and checks it
    /// against `max-complexity`. Returns the cost.
    pub fn check_complexity(&self, field_count: usize) -> Result<f64> {
        let cost = field_count as f64 * self.field_impact();
        match self.settings.max_complexity {
            Some(max) if cost > f64::from(max) => Err(QueryError::ComplexityExceeded {
                cost,
                max: f64::from(max),
            }),
            _ => Ok(cost),
        }
    }

    /// Number of results to return for a request asking for `requested`
    /// (`None` means the caller did not say).
    pub fn check_result_count(&self, requested: Option<usize>) -> Result<usize> {
        let Some(requested) = requested else {
            return Ok(self.settings.default_number_of_results);
        };
        let max = self.settings.max_number_of_results;
        if requested <= max {
            return Ok(requested);
        }
        match self.result_count_mode {
            ResultCountMode::Enabled => Err(QueryError::ResultLimitExceeded { requested, max }),
            _ => {
                warn!(
                    requested,
                    max, "result count above the configured maximum; validation is disabled"
                );
                Ok(requested)
            }
        }
    }

    /// Message to show the caller for `err`. Validation failures are always
    /// reported in full; other errors only when exceptions are exposed.
    pub fn describe_error(&self, err: &QueryError) -> String {
        if self.expose_exceptions || err.is_validation() {
            err.to_string()
        } else {
            GENERIC_ERROR_MESSAGE.to_string()
        }
    }
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self::new(QuerySettings::default(), HostEnvironment::default())
    }
}
