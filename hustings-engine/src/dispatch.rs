//! Request validation and electoral-system routing.
use crate::election::{ElectoralSystem, GenerationRequest};
use crate::output::GenerationError;

/// Validate a request and resolve the electoral system that will populate it.
///
/// # Errors
///
/// `MissingElectionType` and `EmptyPartyScope` for requests that cannot be
/// populated at all; `UnsupportedSystem` for systems another generator must
/// handle.
pub fn resolve_system(request: &GenerationRequest) -> Result<ElectoralSystem, GenerationError> {
    let election = request
        .election_type
        .as_ref()
        .ok_or(GenerationError::MissingElectionType)?;
    if request.parties_in_scope.is_empty() {
        return Err(GenerationError::EmptyPartyScope);
    }
    election
        .electoral_system
        .parse::<ElectoralSystem>()
        .map_err(|system| GenerationError::UnsupportedSystem { system })
}
