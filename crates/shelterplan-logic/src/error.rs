use thiserror::Error;

/// Failures of a planning run or of catalog loading.
///
/// Numeric garbage is not an error here; these variants cover records that
/// cannot be matched up by id and input that cannot be parsed at all.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("demand entry references unknown zone `{0}`")]
    UnknownZone(String),
    #[error("zone id `{0}` appears more than once in the zone catalog")]
    DuplicateZone(String),
    #[error("shelter id `{0}` appears more than once in the shelter catalog")]
    DuplicateShelter(String),
    #[error("zone `{0}` has more than one demand entry")]
    DuplicateDemand(String),
    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
