use crate::wire::HealthRes;

/// Simple health service shared by the REST API and the CLI.
///
/// This service provides a standardised way to check the health status of the triage service.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Check health without creating an instance.
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "MediChain triage is alive".into(),
        }
    }
}
